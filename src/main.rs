/// EDGAR financial statements collector
///
/// Reads the active US roster from SQLite, maps symbols to CIKs, extracts
/// annual and quarterly statements from bulk companyfacts documents and
/// upserts them back into the database.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::error;
use tracing_subscriber::EnvFilter;

use edgar_financials::database_sqlx::DatabaseManagerSqlx;
use edgar_financials::extractors::FactsExtractor;
use edgar_financials::models::Config;
use edgar_financials::statement_collector::{CollectOptions, StatementCollector};

#[derive(Parser)]
#[command(
    name = "edgar-financials",
    about = "📈 SEC EDGAR financial statement extraction",
    long_about = "Extracts revenue, operating income, net income, assets, liabilities, equity and shares outstanding from SEC companyfacts files."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Extract statements for every active US stock and store them
    Collect {
        /// Companies processed at once (overrides CONCURRENCY)
        #[arg(long, short)]
        workers: Option<usize>,

        /// Log progress every N companies (overrides PROGRESS_INTERVAL)
        #[arg(long)]
        progress_interval: Option<usize>,

        /// Statements per write transaction (overrides WRITE_CHUNK_SIZE)
        #[arg(long)]
        chunk_size: Option<usize>,

        /// Directory of CIK##########.json files (overrides COMPANYFACTS_DIR)
        #[arg(long)]
        companyfacts_dir: Option<String>,

        /// Local company_tickers.json instead of downloading it
        #[arg(long)]
        tickers_file: Option<String>,

        /// Only these symbols, comma separated
        #[arg(long, value_delimiter = ',')]
        symbols: Option<Vec<String>>,

        /// Process at most N stocks
        #[arg(long, short)]
        limit: Option<usize>,

        /// Extract without writing to the database
        #[arg(long)]
        dry_run: bool,
    },

    /// Extract one companyfacts file and print the statements as JSON
    Extract {
        /// Path to a companyfacts JSON document
        #[arg(long, short)]
        file: PathBuf,

        /// Stock id stamped on the output
        #[arg(long, default_value_t = 0)]
        stock_id: i64,
    },

    /// Show roster and statement counts
    Status,

    /// Add or update a stock in the roster
    AddStock {
        symbol: String,

        /// US_NYSE or US_NASDAQ; other markets are ignored by collect
        #[arg(long, default_value = "US_NASDAQ")]
        market: String,

        /// Mark the listing inactive
        #[arg(long)]
        inactive: bool,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("edgar_financials=info")),
        )
        .init();

    if let Err(e) = run(Cli::parse()).await {
        error!("{:#}", e);
        eprintln!("❌ {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Extract { file, stock_id } => extract_file(&file, stock_id),
        Command::Collect {
            workers,
            progress_interval,
            chunk_size,
            companyfacts_dir,
            tickers_file,
            symbols,
            limit,
            dry_run,
        } => {
            let mut config = Config::from_env()?;
            if let Some(workers) = workers {
                config.concurrency = workers;
            }
            if let Some(interval) = progress_interval {
                config.progress_interval = interval;
            }
            if let Some(size) = chunk_size {
                config.write_chunk_size = size;
            }
            if let Some(dir) = companyfacts_dir {
                config.companyfacts_dir = dir;
            }
            if tickers_file.is_some() {
                config.tickers_file = tickers_file;
            }

            let database = Arc::new(DatabaseManagerSqlx::new(&config.database_path).await?);
            let collector = StatementCollector::new(config, database);
            let summary = collector
                .collect(&CollectOptions { symbols, limit, dry_run })
                .await?;

            println!("📊 Collection summary");
            println!("══════════════════════════════════════");
            println!("  Stocks:      {}", summary.companies);
            println!("  Matched:     {}", summary.matched);
            println!("  Skipped:     {}", summary.skipped);
            println!("  Failed:      {}", summary.failed);
            println!("  Statements:  {}", summary.statements);
            println!("  Saved:       {}", summary.saved);
            Ok(())
        }
        Command::Status => {
            let config = Config::from_env()?;
            let database = DatabaseManagerSqlx::new(&config.database_path).await?;
            let roster = database.get_active_us_stocks().await?;
            let statements = database.count_financial_statements().await?;

            println!("💾 {}", config.database_path);
            println!("  Active US stocks:      {}", roster.len());
            println!("  Financial statements:  {}", statements);
            Ok(())
        }
        Command::AddStock { symbol, market, inactive } => {
            let config = Config::from_env()?;
            let database = DatabaseManagerSqlx::new(&config.database_path).await?;
            let id = database
                .upsert_stock(&symbol.to_uppercase(), &market, !inactive)
                .await?;
            println!("✅ {} ({}) -> stock id {}", symbol.to_uppercase(), market, id);
            Ok(())
        }
    }
}

fn extract_file(file: &Path, stock_id: i64) -> Result<()> {
    let raw = std::fs::read(file).with_context(|| format!("failed to read {}", file.display()))?;
    let statements = FactsExtractor::new()
        .extract(stock_id, &raw)
        .with_context(|| format!("failed to extract {}", file.display()))?;

    println!("{}", serde_json::to_string_pretty(&statements)?);
    Ok(())
}
