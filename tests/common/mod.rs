//! Common test utilities and helpers

pub mod fixtures;

use anyhow::Result;
use edgar_financials::database_sqlx::DatabaseManagerSqlx;
use tempfile::TempDir;

/// A throwaway SQLite database that lives as long as this value
pub struct TestDatabase {
    pub db: DatabaseManagerSqlx,
    _dir: TempDir,
}

impl TestDatabase {
    pub async fn new() -> Result<Self> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("test_stocks.db");
        let db = DatabaseManagerSqlx::new(&path.to_string_lossy()).await?;
        Ok(Self { db, _dir: dir })
    }
}

/// Logging utilities for tests
pub mod logging {
    use std::sync::Once;
    use tracing::info;

    static INIT: Once = Once::new();

    /// Initialize test logging
    pub fn init_test_logging() {
        INIT.call_once(|| {
            // Another test may already have installed a subscriber
            let _ = tracing::subscriber::set_global_default(
                tracing_subscriber::fmt()
                    .with_env_filter("edgar_financials=debug")
                    .with_test_writer()
                    .finish(),
            );
        });
    }

    /// Log test step
    pub fn log_test_step(step: &str) {
        info!("🧪 Test Step: {}", step);
    }
}
