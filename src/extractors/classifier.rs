use once_cell::sync::Lazy;
use regex::Regex;

use super::company_facts::{FiscalPeriod, RawObservation};
use super::concepts::{Metric, StatementKind, ANNUAL_FORMS, QUARTERLY_FORMS};
use crate::models::ReportType;

/// Point-in-time frame, e.g. `CY2023Q4I`
static INSTANT_FRAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^CY\d{4}Q[1-4]I$").expect("valid instant frame regex"));

/// Single-quarter duration frame, e.g. `CY2023Q2`
static SINGLE_QUARTER_FRAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^CY\d{4}Q[1-4]$").expect("valid quarter frame regex"));

pub const MIN_FISCAL_YEAR: i32 = 1900;
pub const MAX_FISCAL_YEAR: i32 = 2100;

/// Where an observation lands for one metric
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Annual {
        fiscal_year: i32,
    },
    Quarterly {
        fiscal_year: i32,
        quarter: ReportType,
        /// The frame pins the value to exactly one quarter, so it replaces
        /// whatever an earlier, less specific observation wrote.
        overwrite: bool,
    },
    Reject,
}

pub fn is_instant_frame(frame: &str) -> bool {
    INSTANT_FRAME.is_match(frame)
}

pub fn is_single_quarter_frame(frame: &str) -> bool {
    SINGLE_QUARTER_FRAME.is_match(frame)
}

pub fn classify(observation: &RawObservation, metric: Metric) -> Classification {
    let fiscal_year = match observation.fiscal_year {
        Some(fy) if fy != 0 => fy,
        _ => return Classification::Reject,
    };
    if observation.value.is_none() || !(MIN_FISCAL_YEAR..=MAX_FISCAL_YEAR).contains(&fiscal_year) {
        return Classification::Reject;
    }

    let form = observation.form.as_deref().unwrap_or("");
    let frame = observation.frame.as_deref().filter(|f| !f.is_empty());

    match observation.fiscal_period {
        Some(FiscalPeriod::FY) if ANNUAL_FORMS.contains(&form) => {
            if metric.kind() == StatementKind::BalanceSheet
                && frame.map_or(false, |f| !is_instant_frame(f))
            {
                return Classification::Reject;
            }
            Classification::Annual { fiscal_year }
        }
        Some(ref period) if QUARTERLY_FORMS.contains(&form) => {
            let quarter = match period {
                FiscalPeriod::Q1 => ReportType::Q1,
                FiscalPeriod::Q2 => ReportType::Q2,
                FiscalPeriod::Q3 => ReportType::Q3,
                _ => return Classification::Reject,
            };

            let accepted = match (metric.kind(), frame) {
                (_, None) => true,
                (StatementKind::IncomeStatement, Some(f)) => is_single_quarter_frame(f),
                (StatementKind::BalanceSheet, Some(f)) => is_instant_frame(f),
            };
            if !accepted {
                return Classification::Reject;
            }

            Classification::Quarterly {
                fiscal_year,
                quarter,
                overwrite: frame.map_or(false, is_single_quarter_frame),
            }
        }
        _ => Classification::Reject,
    }
}
