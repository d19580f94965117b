use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{info, warn};

use crate::api::SecEdgarClient;
use crate::concurrent_extractor::{extract_companies_concurrently, ConcurrentExtractConfig, ProgressCallback};
use crate::database_sqlx::DatabaseManagerSqlx;
use crate::extractors::FactsExtractor;
use crate::loader::{CompanyFactsDir, DocumentLoader};
use crate::models::{Config, StockEntry};
use crate::ticker_map::TickerMap;

/// Knobs for one collection run, on top of [`Config`]
#[derive(Debug, Clone, Default)]
pub struct CollectOptions {
    /// Only process these symbols (case-insensitive)
    pub symbols: Option<Vec<String>>,
    /// Stop after this many roster entries
    pub limit: Option<usize>,
    /// Extract but do not write to the database
    pub dry_run: bool,
}

/// Final numbers of a collection run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectionSummary {
    pub companies: usize,
    pub matched: usize,
    pub failed: usize,
    pub skipped: usize,
    pub statements: usize,
    pub saved: usize,
}

/// Runs roster + ticker map -> extraction -> upsert
pub struct StatementCollector {
    config: Config,
    database: Arc<DatabaseManagerSqlx>,
}

impl StatementCollector {
    pub fn new(config: Config, database: Arc<DatabaseManagerSqlx>) -> Self {
        Self { config, database }
    }

    /// Ticker map from `TICKERS_FILE` when set, otherwise from SEC
    pub async fn load_ticker_map(&self) -> Result<TickerMap> {
        if let Some(path) = &self.config.tickers_file {
            info!("📇 Loading ticker map from {}", path);
            return TickerMap::from_file(path)
                .with_context(|| format!("failed to load ticker map from {}", path));
        }

        info!("📇 Fetching ticker map from {}", self.config.tickers_url);
        let client = SecEdgarClient::new(&self.config.sec_user_agent, self.config.rate_limit_per_second)?;
        client.fetch_ticker_map(&self.config.tickers_url).await
    }

    pub async fn load_roster(&self, options: &CollectOptions) -> Result<Vec<StockEntry>> {
        let stocks = self.database.get_active_us_stocks().await?;
        Ok(filter_roster(stocks, options))
    }

    /// Run a full collection against the configured companyfacts directory
    pub async fn collect(&self, options: &CollectOptions) -> Result<CollectionSummary> {
        let loader: Arc<dyn DocumentLoader> = Arc::new(CompanyFactsDir::new(&self.config.companyfacts_dir));
        self.collect_with_loader(loader, options, None).await
    }

    pub async fn collect_with_loader(
        &self,
        loader: Arc<dyn DocumentLoader>,
        options: &CollectOptions,
        on_progress: Option<ProgressCallback>,
    ) -> Result<CollectionSummary> {
        info!("📋 Loading roster and ticker map...");
        let (ticker_map, stocks) = tokio::try_join!(self.load_ticker_map(), self.load_roster(options))?;

        if stocks.is_empty() {
            warn!("No active US stocks in the database");
            return Ok(CollectionSummary::default());
        }
        info!("📊 Found {} active stocks to process", stocks.len());

        let result = extract_companies_concurrently(
            stocks,
            Arc::new(ticker_map),
            loader,
            FactsExtractor::new(),
            ConcurrentExtractConfig {
                num_workers: self.config.concurrency,
                progress_interval: self.config.progress_interval,
            },
            on_progress,
        )
        .await?;

        let saved = if options.dry_run {
            info!("Dry run: skipping database write of {} statements", result.statements.len());
            0
        } else {
            self.database
                .upsert_financial_statements(&result.statements, self.config.write_chunk_size)
                .await?
                .processed
        };

        let summary = CollectionSummary {
            companies: result.total,
            matched: result.matched_count,
            failed: result.failed_count,
            skipped: result.skipped_count,
            statements: result.statements.len(),
            saved,
        };

        info!(
            "🎉 Done: {} saved from {} stocks, {} failed",
            summary.saved, summary.matched, summary.failed
        );
        Ok(summary)
    }
}

fn filter_roster(stocks: Vec<StockEntry>, options: &CollectOptions) -> Vec<StockEntry> {
    let wanted: Option<Vec<String>> = options
        .symbols
        .as_ref()
        .map(|symbols| symbols.iter().map(|s| s.trim().to_uppercase()).collect());

    let filtered = stocks
        .into_iter()
        .filter(|stock| {
            wanted
                .as_ref()
                .map_or(true, |w| w.contains(&stock.symbol.to_uppercase()))
        });

    match options.limit {
        Some(limit) => {
            info!("🔢 Limiting to {} stocks", limit);
            filtered.take(limit).collect()
        }
        None => filtered.collect(),
    }
}
