//! Symbol to CIK lookup built from SEC `company_tickers.json`

use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;
use tracing::info;

use crate::models::Cik;

#[derive(Debug, Error)]
pub enum TickerMapError {
    #[error("company tickers payload is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("company tickers payload is not a JSON object")]
    NotAnObject,
    #[error("failed to read company tickers file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Case-insensitive symbol to CIK map
#[derive(Debug, Clone, Default)]
pub struct TickerMap {
    by_symbol: HashMap<String, Cik>,
}

#[derive(Debug, Deserialize)]
struct TickerEntry {
    #[serde(default)]
    ticker: Option<String>,
    #[serde(default)]
    cik_str: Option<Value>,
}

impl TickerMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, symbol: &str, cik: Cik) {
        self.by_symbol.insert(symbol.to_uppercase(), cik);
    }

    pub fn get(&self, symbol: &str) -> Option<Cik> {
        self.by_symbol.get(&symbol.to_uppercase()).copied()
    }

    pub fn len(&self) -> usize {
        self.by_symbol.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_symbol.is_empty()
    }

    /// Parse the `company_tickers.json` payload:
    /// `{"0": {"cik_str": 320193, "ticker": "AAPL", "title": "Apple Inc."}, ...}`.
    /// Entries without a usable ticker or CIK are skipped.
    pub fn from_company_tickers(payload: &[u8]) -> Result<Self, TickerMapError> {
        let root: Value = serde_json::from_slice(payload)?;
        let Value::Object(entries) = root else {
            return Err(TickerMapError::NotAnObject);
        };

        let mut map = TickerMap::new();
        for entry in entries.into_values() {
            let Ok(entry) = serde_json::from_value::<TickerEntry>(entry) else {
                continue;
            };
            let (Some(ticker), Some(cik)) = (
                entry.ticker.filter(|t| !t.is_empty()),
                entry.cik_str.as_ref().and_then(parse_cik),
            ) else {
                continue;
            };
            map.insert(&ticker, cik);
        }

        info!("📇 Loaded {} ticker-to-CIK mappings", map.len());
        Ok(map)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, TickerMapError> {
        let path = path.as_ref();
        let payload = std::fs::read(path).map_err(|source| TickerMapError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_company_tickers(&payload)
    }
}

fn parse_cik(value: &Value) -> Option<Cik> {
    let cik = match value {
        Value::Number(n) => n.as_u64()?,
        Value::String(s) => s.trim().parse().ok()?,
        _ => return None,
    };
    (cik != 0).then_some(Cik(cik))
}

impl FromIterator<(String, Cik)> for TickerMap {
    fn from_iter<I: IntoIterator<Item = (String, Cik)>>(iter: I) -> Self {
        let mut map = TickerMap::new();
        for (symbol, cik) in iter {
            map.insert(&symbol, cik);
        }
        map
    }
}
