use serde::{Deserialize, Serialize};
use std::fmt;

/// A tracked security from the stock roster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockEntry {
    pub stock_id: i64,
    pub symbol: String,
}

impl StockEntry {
    pub fn new(stock_id: i64, symbol: impl Into<String>) -> Self {
        Self {
            stock_id,
            symbol: symbol.into(),
        }
    }
}

/// SEC Central Index Key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cik(pub u64);

impl Cik {
    /// File name of this company's document inside an extracted companyfacts archive
    pub fn companyfacts_file_name(&self) -> String {
        format!("CIK{:010}.json", self.0)
    }
}

impl fmt::Display for Cik {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:010}", self.0)
    }
}

/// Reporting period of a normalized statement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ReportType {
    Q1,
    Q2,
    Q3,
    FY,
}

impl ReportType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportType::Q1 => "Q1",
            ReportType::Q2 => "Q2",
            ReportType::Q3 => "Q3",
            ReportType::FY => "FY",
        }
    }

    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "Q1" => Some(ReportType::Q1),
            "Q2" => Some(ReportType::Q2),
            "Q3" => Some(ReportType::Q3),
            "FY" => Some(ReportType::FY),
            _ => None,
        }
    }
}

impl fmt::Display for ReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One normalized financial statement for a company and period.
///
/// Metric values are kept as the numeric text found in the source document so
/// that no precision is lost on the way to storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinancialStatement {
    pub stock_id: i64,
    pub fiscal_year: i32,
    pub report_type: ReportType,
    pub revenue: Option<String>,
    pub operating_income: Option<String>,
    pub net_income: Option<String>,
    pub total_assets: Option<String>,
    pub total_liabilities: Option<String>,
    pub total_equity: Option<String>,
    pub shares_outstanding: Option<i64>,
}

/// Outcome of a batch extraction run
#[derive(Debug, Default)]
pub struct BatchResult {
    pub statements: Vec<FinancialStatement>,
    pub total: usize,
    pub matched_count: usize,
    pub failed_count: usize,
    /// Companies without a CIK or without a companyfacts document
    pub skipped_count: usize,
}

/// Configuration for the application
#[derive(Debug, Clone)]
pub struct Config {
    pub database_path: String,
    pub companyfacts_dir: String,
    pub sec_user_agent: String,
    pub tickers_url: String,
    pub tickers_file: Option<String>,
    pub concurrency: usize,
    pub progress_interval: usize,
    pub write_chunk_size: usize,
    pub rate_limit_per_second: u32,
}

pub const DEFAULT_TICKERS_URL: &str = "https://www.sec.gov/files/company_tickers.json";

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if it exists

        let tickers_url = std::env::var("TICKERS_URL")
            .unwrap_or_else(|_| DEFAULT_TICKERS_URL.to_string());
        url::Url::parse(&tickers_url)
            .map_err(|e| anyhow::anyhow!("TICKERS_URL is not a valid URL ({}): {}", tickers_url, e))?;

        Ok(Config {
            database_path: std::env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "stocks.db".to_string()),
            companyfacts_dir: std::env::var("COMPANYFACTS_DIR")
                .unwrap_or_else(|_| "/tmp/edgar/companyfacts".to_string()),
            sec_user_agent: std::env::var("SEC_USER_AGENT")
                .unwrap_or_else(|_| "edgar-financials admin@example.com".to_string()),
            tickers_url,
            tickers_file: std::env::var("TICKERS_FILE").ok().filter(|s| !s.is_empty()),
            concurrency: env_or("CONCURRENCY", 50),
            progress_interval: env_or("PROGRESS_INTERVAL", 500),
            write_chunk_size: env_or("WRITE_CHUNK_SIZE", 2000),
            rate_limit_per_second: env_or("RATE_LIMIT_PER_SECOND", 10),
        })
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|raw| raw.trim().parse().ok())
        .unwrap_or(default)
}
