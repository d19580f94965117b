//! Companyfacts documents for tests

use serde_json::{json, Map, Value};
use std::path::Path;

use edgar_financials::models::Cik;

/// One fact observation as SEC publishes it
pub fn fact(val: Value, form: &str, fy: i32, fp: &str, frame: Option<&str>) -> Value {
    let mut observation = json!({
        "val": val,
        "form": form,
        "fy": fy,
        "fp": fp,
    });
    if let Some(frame) = frame {
        observation["frame"] = json!(frame);
    }
    observation
}

/// Builds a companyfacts document concept by concept
#[derive(Debug, Default)]
pub struct CompanyFactsBuilder {
    us_gaap: Map<String, Value>,
    dei: Map<String, Value>,
}

impl CompanyFactsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a us-gaap concept with USD observations
    pub fn usd(mut self, concept: &str, observations: Vec<Value>) -> Self {
        self.us_gaap
            .insert(concept.to_string(), json!({ "units": { "USD": observations } }));
        self
    }

    /// Add a dei concept with share observations
    pub fn dei_shares(mut self, concept: &str, observations: Vec<Value>) -> Self {
        self.dei
            .insert(concept.to_string(), json!({ "units": { "shares": observations } }));
        self
    }

    pub fn build(self) -> Value {
        json!({
            "cik": 1,
            "entityName": "Test Corp",
            "facts": {
                "us-gaap": Value::Object(self.us_gaap),
                "dei": Value::Object(self.dei),
            }
        })
    }

    pub fn to_bytes(self) -> Vec<u8> {
        serde_json::to_vec(&self.build()).expect("fixture serializes")
    }
}

/// Annual net income of 100 for 2022 and 80 for 2021, nothing else
pub fn two_year_net_income() -> Vec<u8> {
    CompanyFactsBuilder::new()
        .usd(
            "NetIncomeLoss",
            vec![
                fact(json!(100), "10-K", 2022, "FY", None),
                fact(json!(80), "10-K", 2021, "FY", None),
            ],
        )
        .to_bytes()
}

/// Write a document into a companyfacts directory under its CIK file name
pub fn write_companyfacts(dir: &Path, cik: Cik, raw: &[u8]) {
    std::fs::write(dir.join(cik.companyfacts_file_name()), raw).expect("fixture written");
}

/// A `company_tickers.json` payload
pub fn company_tickers(entries: &[(&str, u64)]) -> Vec<u8> {
    let map: Map<String, Value> = entries
        .iter()
        .enumerate()
        .map(|(i, (ticker, cik))| {
            (
                i.to_string(),
                json!({ "cik_str": cik, "ticker": ticker, "title": format!("{} Inc", ticker) }),
            )
        })
        .collect();
    serde_json::to_vec(&Value::Object(map)).expect("fixture serializes")
}
