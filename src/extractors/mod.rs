//! Financial statement extraction from SEC companyfacts documents
//!
//! One companyfacts document goes in, a short ordered list of normalized
//! statements comes out. Each call owns its buckets, so extraction needs no
//! synchronization and can run on any thread.

pub mod assembler;
pub mod classifier;
pub mod company_facts;
pub mod concepts;
pub mod resolver;

use chrono::{Datelike, Utc};
use serde_json::{Number, Value};
use thiserror::Error;
use tracing::debug;

use crate::models::FinancialStatement;
use assembler::{AnnualBuckets, QuarterlyBuckets, SharesTable};
use classifier::Classification;
use company_facts::{CompanyFacts, Taxonomy};
use concepts::{Metric, SHARES_CONCEPTS, US_GAAP};

/// How many fiscal years back still count as "recent" when ranking concepts
pub const RECENT_YEARS: i32 = 3;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("companyfacts document is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("companyfacts document is not a JSON object (found {0})")]
    NotAnObject(&'static str),
}

/// Extracts normalized statements from companyfacts documents
#[derive(Debug, Clone)]
pub struct FactsExtractor {
    min_recent_year: i32,
}

impl Default for FactsExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FactsExtractor {
    /// Extractor ranking concepts relative to the current calendar year
    pub fn new() -> Self {
        Self::with_reference_year(Utc::now().year())
    }

    pub fn with_reference_year(year: i32) -> Self {
        Self {
            min_recent_year: year - RECENT_YEARS,
        }
    }

    pub fn min_recent_year(&self) -> i32 {
        self.min_recent_year
    }

    /// Decode a raw companyfacts document and extract its statements
    pub fn extract(&self, stock_id: i64, raw: &[u8]) -> Result<Vec<FinancialStatement>, ExtractError> {
        let value: Value = serde_json::from_slice(raw)?;
        if !value.is_object() {
            return Err(ExtractError::NotAnObject(json_kind(&value)));
        }
        let facts: CompanyFacts = serde_json::from_value(value)?;
        Ok(self.extract_facts(stock_id, &facts))
    }

    /// Extract statements from an already decoded document
    pub fn extract_facts(&self, stock_id: i64, facts: &CompanyFacts) -> Vec<FinancialStatement> {
        let mut annual = AnnualBuckets::new();
        let mut quarterly = QuarterlyBuckets::new();

        if let Some(us_gaap) = facts.taxonomy(US_GAAP) {
            for metric in Metric::ALL {
                self.place_metric(us_gaap, metric, &mut annual, &mut quarterly);
            }
        }

        let shares = extract_shares(facts);

        debug!(
            "Stock {} ({}): {} annual buckets, {} quarterly buckets, {} share counts",
            stock_id,
            facts.entity_name.as_deref().unwrap_or("unknown entity"),
            annual.len(),
            quarterly.len(),
            shares.len()
        );

        assembler::assemble(stock_id, annual, quarterly, &shares)
    }

    fn place_metric(
        &self,
        us_gaap: &Taxonomy,
        metric: Metric,
        annual: &mut AnnualBuckets,
        quarterly: &mut QuarterlyBuckets,
    ) {
        let observations = resolver::resolve(metric.candidates(), us_gaap, self.min_recent_year);

        for observation in observations {
            let Some(value) = observation.value.as_ref() else {
                continue;
            };

            match classifier::classify(observation, metric) {
                Classification::Annual { fiscal_year } => {
                    annual
                        .entry(fiscal_year)
                        .or_default()
                        .insert_if_absent(metric, value.to_string());
                }
                Classification::Quarterly { fiscal_year, quarter, overwrite } => {
                    let bucket = quarterly.entry((fiscal_year, quarter)).or_default();
                    if overwrite {
                        bucket.overwrite(metric, value.to_string());
                    } else {
                        bucket.insert_if_absent(metric, value.to_string());
                    }
                }
                Classification::Reject => {}
            }
        }
    }
}

/// Outstanding shares from the first (taxonomy, concept) source that yields
/// anything. All units of that concept are scanned.
pub fn extract_shares(facts: &CompanyFacts) -> SharesTable {
    let mut shares = SharesTable::default();

    for (taxonomy, concept) in SHARES_CONCEPTS {
        let Some(concept) = facts.taxonomy(taxonomy).and_then(|t| t.concept(concept)) else {
            continue;
        };

        for observations in concept.units.values() {
            for observation in observations.iter() {
                let (Some(fy), Some(period), Some(count)) = (
                    observation.fiscal_year.filter(|fy| *fy != 0),
                    observation.fiscal_period.as_ref().map(|p| p.as_label()).filter(|p| !p.is_empty()),
                    observation.value.as_ref().and_then(share_count),
                ) else {
                    continue;
                };
                shares.insert_if_absent(period, fy, count);
            }
        }

        if !shares.is_empty() {
            break;
        }
    }

    shares
}

/// Whole share count, truncating fractional values; zero counts are ignored
fn share_count(value: &Number) -> Option<i64> {
    let count = match value.as_i64() {
        Some(n) => n,
        None => {
            let f = value.as_f64()?.trunc();
            // 2^63; anything at or past it would saturate the cast
            if !f.is_finite() || f >= 9_223_372_036_854_775_808.0 || f < -9_223_372_036_854_775_808.0 {
                return None;
            }
            f as i64
        }
    };
    let raw_is_zero = value.as_f64().map_or(false, |f| f == 0.0);
    (!raw_is_zero).then_some(count)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
