//! Concurrent companyfacts extraction module
//!
//! This module fans a stock roster out over a fixed pool of worker tasks. Each
//! worker pulls the next company from a shared queue, resolves its CIK, loads
//! its companyfacts document and extracts statements on the blocking pool.
//! One company's failure never stops the batch; it only shows up in the
//! counts.

use anyhow::Result;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::Mutex as AsyncMutex;
use tracing::{debug, info, warn};

use crate::{
    extractors::FactsExtractor,
    loader::{DocumentLoader, LoadError},
    models::{BatchResult, FinancialStatement, StockEntry},
    ticker_map::TickerMap,
};

pub const DEFAULT_CONCURRENCY: usize = 50;
pub const DEFAULT_PROGRESS_INTERVAL: usize = 500;

/// Configuration for concurrent extraction
#[derive(Debug, Clone)]
pub struct ConcurrentExtractConfig {
    /// Number of worker tasks, i.e. the most companies in flight at once
    pub num_workers: usize,
    /// Report progress every this many completed companies
    pub progress_interval: usize,
}

impl Default for ConcurrentExtractConfig {
    fn default() -> Self {
        Self {
            num_workers: DEFAULT_CONCURRENCY,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }
}

/// Called with (completed, total). Runs while the batch counters are locked,
/// so it should return quickly.
pub type ProgressCallback = Arc<dyn Fn(usize, usize) + Send + Sync>;

/// What happened to one company
#[derive(Debug)]
enum CompanyOutcome {
    Extracted(Vec<FinancialStatement>),
    NoIdentifier,
    NoDocument,
    Failed(String),
}

/// Everything the workers share
struct BatchContext {
    queue: AsyncMutex<VecDeque<StockEntry>>,
    ticker_map: Arc<TickerMap>,
    loader: Arc<dyn DocumentLoader>,
    extractor: FactsExtractor,
    counters: Mutex<BatchCounters>,
    progress_interval: usize,
    on_progress: Option<ProgressCallback>,
}

/// Internal counters for tracking progress
#[derive(Debug, Default)]
struct BatchCounters {
    total: usize,
    completed: usize,
    matched: usize,
    failed: usize,
    skipped: usize,
    statements: Vec<FinancialStatement>,
}

/// Extract statements for every company in the roster
pub async fn extract_companies_concurrently(
    companies: Vec<StockEntry>,
    ticker_map: Arc<TickerMap>,
    loader: Arc<dyn DocumentLoader>,
    extractor: FactsExtractor,
    config: ConcurrentExtractConfig,
    on_progress: Option<ProgressCallback>,
) -> Result<BatchResult> {
    let total = companies.len();
    let num_workers = config.num_workers.max(1).min(total.max(1));

    info!("🚀 Starting concurrent extraction of {} companies with {} workers", total, num_workers);

    let context = Arc::new(BatchContext {
        queue: AsyncMutex::new(companies.into()),
        ticker_map,
        loader,
        extractor,
        counters: Mutex::new(BatchCounters {
            total,
            ..BatchCounters::default()
        }),
        progress_interval: config.progress_interval.max(1),
        on_progress,
    });

    let handles: Vec<_> = (0..num_workers)
        .map(|worker_id| {
            let context = Arc::clone(&context);
            tokio::spawn(async move { worker(worker_id, context).await })
        })
        .collect();

    futures::future::try_join_all(handles).await?;

    if let Some(callback) = &context.on_progress {
        callback(total, total);
    }

    let counters = std::mem::take(
        &mut *context.counters.lock().unwrap_or_else(PoisonError::into_inner),
    );

    info!(
        "✅ Extraction done: {} matched, {} failed, {} skipped, {} statements",
        counters.matched,
        counters.failed,
        counters.skipped,
        counters.statements.len()
    );

    Ok(BatchResult {
        statements: counters.statements,
        total,
        matched_count: counters.matched,
        failed_count: counters.failed,
        skipped_count: counters.skipped,
    })
}

async fn worker(worker_id: usize, context: Arc<BatchContext>) {
    debug!("Worker {} started", worker_id);

    loop {
        let next = context.queue.lock().await.pop_front();
        let Some(stock) = next else {
            break;
        };

        let outcome = process_company(&context, &stock).await;
        record_outcome(&context, &stock, outcome);
    }

    debug!("Worker {} finished - no more companies", worker_id);
}

/// Resolve, load and extract one company. Never holds the counters lock.
async fn process_company(context: &BatchContext, stock: &StockEntry) -> CompanyOutcome {
    let Some(cik) = context.ticker_map.get(&stock.symbol) else {
        debug!("No CIK for {} ({}), skipping", stock.symbol, stock.stock_id);
        return CompanyOutcome::NoIdentifier;
    };

    let raw = match context.loader.load(cik).await {
        Ok(raw) => raw,
        Err(LoadError::NotFound(_)) => {
            debug!("No companyfacts document for {} (CIK {})", stock.symbol, cik);
            return CompanyOutcome::NoDocument;
        }
        Err(e) => return CompanyOutcome::Failed(e.to_string()),
    };

    let extractor = context.extractor.clone();
    let stock_id = stock.stock_id;
    match tokio::task::spawn_blocking(move || extractor.extract(stock_id, &raw)).await {
        Ok(Ok(statements)) => CompanyOutcome::Extracted(statements),
        Ok(Err(e)) => CompanyOutcome::Failed(e.to_string()),
        Err(join_error) => CompanyOutcome::Failed(format!("extraction aborted: {}", join_error)),
    }
}

fn record_outcome(context: &BatchContext, stock: &StockEntry, outcome: CompanyOutcome) {
    let mut counters = context.counters.lock().unwrap_or_else(PoisonError::into_inner);

    match outcome {
        CompanyOutcome::Extracted(statements) => {
            counters.statements.extend(statements);
            counters.matched += 1;
        }
        CompanyOutcome::NoIdentifier | CompanyOutcome::NoDocument => {
            counters.skipped += 1;
        }
        CompanyOutcome::Failed(reason) => {
            warn!("Skip {} ({}): {}", stock.symbol, stock.stock_id, reason);
            counters.failed += 1;
        }
    }

    counters.completed += 1;
    if counters.completed % context.progress_interval == 0 {
        info!(
            "📊 Parsed {}/{} stocks, {} statements",
            counters.completed,
            counters.total,
            counters.statements.len()
        );
        if let Some(callback) = &context.on_progress {
            callback(counters.completed, counters.total);
        }
    }
}
