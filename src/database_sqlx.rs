use anyhow::{anyhow, Result};
use sqlx::{sqlite::{SqliteConnectOptions, SqlitePoolOptions}, Row, SqlitePool};
use tracing::{debug, info};

use crate::models::{FinancialStatement, ReportType, StockEntry};

/// Rows per write transaction
pub const DEFAULT_WRITE_CHUNK_SIZE: usize = 2000;

/// Markets whose listings are pulled into the roster
pub const US_MARKETS: [&str; 2] = ["US_NYSE", "US_NASDAQ"];

/// Result of an upsert run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpsertSummary {
    /// Statements sent to the database
    pub processed: usize,
    /// Rows inserted or whose values actually changed
    pub changed: u64,
}

/// SQLX-based database manager for stocks and financial statements
#[derive(Clone)]
pub struct DatabaseManagerSqlx {
    pool: SqlitePool,
}

impl DatabaseManagerSqlx {
    /// Open (or create) the SQLite database and make sure the schema exists
    pub async fn new(database_path: &str) -> Result<Self> {
        let filename = database_path.strip_prefix("sqlite:").unwrap_or(database_path);

        info!("Connecting to database: {}", filename);

        let pool = SqlitePoolOptions::new()
            .max_connections(10)
            .acquire_timeout(std::time::Duration::from_secs(30))
            .connect_with(SqliteConnectOptions::new().filename(filename).create_if_missing(true))
            .await?;

        // Enable WAL mode for better concurrency
        sqlx::query("PRAGMA journal_mode = WAL")
            .execute(&pool)
            .await?;

        sqlx::query("PRAGMA synchronous = NORMAL")
            .execute(&pool)
            .await?;

        let db = Self { pool };
        db.create_schema().await?;
        Ok(db)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn create_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS stocks (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                symbol TEXT NOT NULL,
                market TEXT NOT NULL,
                is_active INTEGER NOT NULL DEFAULT 1,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                UNIQUE(symbol, market)
            )
            "#
        ).execute(&self.pool).await?;

        // Metric values are TEXT so decimal precision survives untouched
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS financial_statements (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                stock_id INTEGER NOT NULL,
                fiscal_year INTEGER NOT NULL,
                report_type TEXT NOT NULL CHECK (report_type IN ('Q1', 'Q2', 'Q3', 'FY')),
                revenue TEXT,
                operating_income TEXT,
                net_income TEXT,
                total_assets TEXT,
                total_liabilities TEXT,
                total_equity TEXT,
                shares_outstanding INTEGER,
                updated_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                FOREIGN KEY (stock_id) REFERENCES stocks(id),
                UNIQUE(stock_id, fiscal_year, report_type)
            )
            "#
        ).execute(&self.pool).await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_financial_statements_stock ON financial_statements(stock_id)"
        ).execute(&self.pool).await?;

        debug!("Schema ready");
        Ok(())
    }

    /// Insert or update a stock listing, returning its id
    pub async fn upsert_stock(&self, symbol: &str, market: &str, is_active: bool) -> Result<i64> {
        let row = sqlx::query(
            r#"
            INSERT INTO stocks (symbol, market, is_active)
            VALUES (?, ?, ?)
            ON CONFLICT(symbol, market) DO UPDATE SET
                is_active = excluded.is_active
            RETURNING id
            "#
        )
        .bind(symbol)
        .bind(market)
        .bind(is_active)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.get::<i64, _>("id"))
    }

    /// Active NYSE and NASDAQ listings
    pub async fn get_active_us_stocks(&self) -> Result<Vec<StockEntry>> {
        let rows = sqlx::query(
            r#"
            SELECT id, symbol
            FROM stocks
            WHERE market IN (?, ?) AND is_active = 1
            ORDER BY id
            "#
        )
        .bind(US_MARKETS[0])
        .bind(US_MARKETS[1])
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| StockEntry {
                stock_id: r.get::<i64, _>("id"),
                symbol: r.get::<String, _>("symbol"),
            })
            .collect())
    }

    /// Upsert statements keyed by (stock_id, fiscal_year, report_type).
    ///
    /// Each chunk is one transaction. Rows whose values are unchanged are left
    /// alone, so replaying the same statements is a no-op.
    pub async fn upsert_financial_statements(
        &self,
        statements: &[FinancialStatement],
        chunk_size: usize,
    ) -> Result<UpsertSummary> {
        let mut summary = UpsertSummary { processed: 0, changed: 0 };
        if statements.is_empty() {
            return Ok(summary);
        }

        for chunk in statements.chunks(chunk_size.max(1)) {
            summary.changed += self.upsert_chunk(chunk).await?;
            summary.processed += chunk.len();
            debug!("Upserted {}/{} statements", summary.processed, statements.len());
        }

        info!(
            "💾 Upserted {} financial statements ({} rows changed)",
            summary.processed, summary.changed
        );
        Ok(summary)
    }

    async fn upsert_chunk(&self, chunk: &[FinancialStatement]) -> Result<u64> {
        let mut tx = self.pool.begin().await?;
        let mut changed = 0;

        for statement in chunk {
            let result = sqlx::query(
                r#"
                INSERT INTO financial_statements
                    (stock_id, fiscal_year, report_type, revenue, operating_income,
                     net_income, total_assets, total_liabilities, total_equity,
                     shares_outstanding)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                ON CONFLICT(stock_id, fiscal_year, report_type) DO UPDATE SET
                    revenue = excluded.revenue,
                    operating_income = excluded.operating_income,
                    net_income = excluded.net_income,
                    total_assets = excluded.total_assets,
                    total_liabilities = excluded.total_liabilities,
                    total_equity = excluded.total_equity,
                    shares_outstanding = excluded.shares_outstanding,
                    updated_at = CURRENT_TIMESTAMP
                WHERE revenue IS NOT excluded.revenue
                   OR operating_income IS NOT excluded.operating_income
                   OR net_income IS NOT excluded.net_income
                   OR total_assets IS NOT excluded.total_assets
                   OR total_liabilities IS NOT excluded.total_liabilities
                   OR total_equity IS NOT excluded.total_equity
                   OR shares_outstanding IS NOT excluded.shares_outstanding
                "#
            )
            .bind(statement.stock_id)
            .bind(statement.fiscal_year)
            .bind(statement.report_type.as_str())
            .bind(&statement.revenue)
            .bind(&statement.operating_income)
            .bind(&statement.net_income)
            .bind(&statement.total_assets)
            .bind(&statement.total_liabilities)
            .bind(&statement.total_equity)
            .bind(statement.shares_outstanding)
            .execute(&mut *tx)
            .await?;

            changed += result.rows_affected();
        }

        tx.commit().await?;
        Ok(changed)
    }

    /// Stored statements for one stock, newest fiscal year first and the
    /// annual statement ahead of that year's quarters
    pub async fn get_financial_statements(&self, stock_id: i64) -> Result<Vec<FinancialStatement>> {
        let rows = sqlx::query(
            r#"
            SELECT stock_id, fiscal_year, report_type, revenue, operating_income, net_income,
                   total_assets, total_liabilities, total_equity, shares_outstanding
            FROM financial_statements
            WHERE stock_id = ?
            ORDER BY fiscal_year DESC,
                     CASE report_type WHEN 'FY' THEN 0 WHEN 'Q3' THEN 1 WHEN 'Q2' THEN 2 ELSE 3 END
            "#
        )
        .bind(stock_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|r| {
                let label = r.get::<String, _>("report_type");
                let report_type = ReportType::parse(&label)
                    .ok_or_else(|| anyhow!("unknown report type '{}' for stock {}", label, stock_id))?;

                Ok(FinancialStatement {
                    stock_id: r.get::<i64, _>("stock_id"),
                    fiscal_year: r.get::<i32, _>("fiscal_year"),
                    report_type,
                    revenue: r.get::<Option<String>, _>("revenue"),
                    operating_income: r.get::<Option<String>, _>("operating_income"),
                    net_income: r.get::<Option<String>, _>("net_income"),
                    total_assets: r.get::<Option<String>, _>("total_assets"),
                    total_liabilities: r.get::<Option<String>, _>("total_liabilities"),
                    total_equity: r.get::<Option<String>, _>("total_equity"),
                    shares_outstanding: r.get::<Option<i64>, _>("shares_outstanding"),
                })
            })
            .collect()
    }

    pub async fn count_financial_statements(&self) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM financial_statements")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
