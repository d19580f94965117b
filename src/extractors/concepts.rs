//! Static taxonomy mappings for the normalized metrics

use serde::Serialize;

/// A normalized financial-statement line item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Revenue,
    OperatingIncome,
    NetIncome,
    TotalAssets,
    TotalLiabilities,
    TotalEquity,
}

/// Which statement a metric belongs to; drives the frame filters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    IncomeStatement,
    BalanceSheet,
}

impl Metric {
    pub const ALL: [Metric; 6] = [
        Metric::Revenue,
        Metric::OperatingIncome,
        Metric::NetIncome,
        Metric::TotalAssets,
        Metric::TotalLiabilities,
        Metric::TotalEquity,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Metric::Revenue => "revenue",
            Metric::OperatingIncome => "operating_income",
            Metric::NetIncome => "net_income",
            Metric::TotalAssets => "total_assets",
            Metric::TotalLiabilities => "total_liabilities",
            Metric::TotalEquity => "total_equity",
        }
    }

    pub fn kind(&self) -> StatementKind {
        match self {
            Metric::Revenue | Metric::OperatingIncome | Metric::NetIncome => {
                StatementKind::IncomeStatement
            }
            Metric::TotalAssets | Metric::TotalLiabilities | Metric::TotalEquity => {
                StatementKind::BalanceSheet
            }
        }
    }

    /// us-gaap concepts reporting this metric, in priority order
    pub fn candidates(&self) -> &'static [&'static str] {
        match self {
            Metric::Revenue => &[
                "RevenueFromContractWithCustomerExcludingAssessedTax",
                "Revenues",
                "SalesRevenueNet",
                "RevenueFromContractWithCustomerIncludingAssessedTax",
                "SalesRevenueGoodsNet",
                "SalesRevenueServicesNet",
                "RegulatedAndUnregulatedOperatingRevenue",
                "HealthCareOrganizationRevenue",
                "RealEstateRevenueNet",
                "OilAndGasRevenue",
                "InterestAndDividendIncomeOperating",
                "InterestIncomeExpenseAfterProvisionForLoanLoss",
                "BrokerageCommissionsRevenue",
            ],
            Metric::OperatingIncome => &["OperatingIncomeLoss"],
            Metric::NetIncome => &[
                "NetIncomeLoss",
                "ProfitLoss",
                "IncomeLossAttributableToParent",
                "NetIncomeLossAvailableToCommonStockholdersBasic",
            ],
            Metric::TotalAssets => &["Assets"],
            Metric::TotalLiabilities => &["Liabilities"],
            Metric::TotalEquity => &[
                "StockholdersEquity",
                "StockholdersEquityIncludingPortionAttributableToNoncontrollingInterest",
                "MembersEquity",
            ],
        }
    }
}

pub const US_GAAP: &str = "us-gaap";
pub const DEI: &str = "dei";

/// (taxonomy, concept) sources for outstanding shares; first populated source wins
pub const SHARES_CONCEPTS: [(&str, &str); 4] = [
    (DEI, "EntityCommonStockSharesOutstanding"),
    (US_GAAP, "CommonStockSharesOutstanding"),
    (US_GAAP, "SharesOutstanding"),
    (US_GAAP, "WeightedAverageNumberOfSharesOutstandingBasic"),
];

pub const ANNUAL_FORMS: [&str; 2] = ["10-K", "10-K/A"];
pub const QUARTERLY_FORMS: [&str; 2] = ["10-Q", "10-Q/A"];
