use std::collections::{BTreeMap, HashMap};

use super::concepts::Metric;
use crate::models::{FinancialStatement, ReportType};

pub const MAX_ANNUAL_STATEMENTS: usize = 3;
pub const MAX_QUARTERLY_STATEMENTS: usize = 8;

/// Resolved metric values for one reporting period
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccountBucket {
    values: BTreeMap<Metric, String>,
}

impl AccountBucket {
    /// Record a value unless the metric already has one
    pub fn insert_if_absent(&mut self, metric: Metric, value: String) {
        self.values.entry(metric).or_insert(value);
    }

    /// Record a value, replacing any earlier one
    pub fn overwrite(&mut self, metric: Metric, value: String) {
        self.values.insert(metric, value);
    }

    pub fn get(&self, metric: Metric) -> Option<&str> {
        self.values.get(&metric).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn take(&mut self, metric: Metric) -> Option<String> {
        self.values.remove(&metric)
    }
}

/// Annual buckets keyed by fiscal year
pub type AnnualBuckets = BTreeMap<i32, AccountBucket>;

/// Quarterly buckets keyed by (fiscal year, quarter)
pub type QuarterlyBuckets = BTreeMap<(i32, ReportType), AccountBucket>;

/// Outstanding share counts keyed by (fiscal period label, fiscal year)
#[derive(Debug, Clone, Default)]
pub struct SharesTable {
    entries: HashMap<(String, i32), i64>,
}

impl SharesTable {
    /// Record a count; the first count seen for a period is kept
    pub fn insert_if_absent(&mut self, period: &str, fiscal_year: i32, shares: i64) {
        self.entries
            .entry((period.to_string(), fiscal_year))
            .or_insert(shares);
    }

    pub fn get(&self, period: &str, fiscal_year: i32) -> Option<i64> {
        self.entries.get(&(period.to_string(), fiscal_year)).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Turn a company's buckets into its statement list: the most recent annual
/// statements first, then the most recent quarterly ones, each group newest
/// first.
pub fn assemble(
    stock_id: i64,
    annual: AnnualBuckets,
    quarterly: QuarterlyBuckets,
    shares: &SharesTable,
) -> Vec<FinancialStatement> {
    let annual_selected = annual
        .into_iter()
        .rev()
        .filter(|(_, bucket)| !bucket.is_empty())
        .take(MAX_ANNUAL_STATEMENTS);

    let quarterly_selected = quarterly
        .into_iter()
        .rev()
        .filter(|((_, quarter), bucket)| !bucket.is_empty() && *quarter != ReportType::FY)
        .take(MAX_QUARTERLY_STATEMENTS);

    let mut statements = Vec::with_capacity(MAX_ANNUAL_STATEMENTS + MAX_QUARTERLY_STATEMENTS);

    for (fiscal_year, bucket) in annual_selected {
        let shares_outstanding = shares.get(ReportType::FY.as_str(), fiscal_year);
        statements.push(build_statement(stock_id, fiscal_year, ReportType::FY, bucket, shares_outstanding));
    }

    for ((fiscal_year, quarter), bucket) in quarterly_selected {
        let shares_outstanding = shares.get(quarter.as_str(), fiscal_year);
        statements.push(build_statement(stock_id, fiscal_year, quarter, bucket, shares_outstanding));
    }

    statements
}

fn build_statement(
    stock_id: i64,
    fiscal_year: i32,
    report_type: ReportType,
    mut bucket: AccountBucket,
    shares_outstanding: Option<i64>,
) -> FinancialStatement {
    FinancialStatement {
        stock_id,
        fiscal_year,
        report_type,
        revenue: bucket.take(Metric::Revenue),
        operating_income: bucket.take(Metric::OperatingIncome),
        net_income: bucket.take(Metric::NetIncome),
        total_assets: bucket.take(Metric::TotalAssets),
        total_liabilities: bucket.take(Metric::TotalLiabilities),
        total_equity: bucket.take(Metric::TotalEquity),
        shares_outstanding,
    }
}
