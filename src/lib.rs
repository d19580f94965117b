pub mod api;
pub mod concurrent_extractor;
pub mod database_sqlx;
pub mod extractors;
pub mod loader;
pub mod models;
pub mod statement_collector;
pub mod ticker_map;

pub use concurrent_extractor::{extract_companies_concurrently, ConcurrentExtractConfig, ProgressCallback};
pub use extractors::{ExtractError, FactsExtractor};
pub use loader::{CompanyFactsDir, DocumentLoader, LoadError};
pub use models::{BatchResult, Cik, FinancialStatement, ReportType, StockEntry};
pub use ticker_map::TickerMap;
