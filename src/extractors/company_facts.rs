//! Typed view of an SEC companyfacts document.
//!
//! The bulk `companyfacts.zip` documents are nested as
//! `facts -> taxonomy -> concept -> units -> unit -> [observation]`, and every
//! level is optional in practice. Decoding here never fails below the top
//! level: a missing or mistyped field is treated as absent, and list entries
//! that are not objects are dropped.

use serde::de::{DeserializeOwned, Deserializer};
use serde::Deserialize;
use serde_json::{Number, Value};
use std::collections::{BTreeMap, HashMap};

/// Root of a companyfacts document
#[derive(Debug, Default, Deserialize)]
pub struct CompanyFacts {
    #[serde(rename = "entityName", default, deserialize_with = "lenient")]
    pub entity_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_map")]
    pub facts: HashMap<String, Taxonomy>,
}

impl CompanyFacts {
    pub fn taxonomy(&self, name: &str) -> Option<&Taxonomy> {
        self.facts.get(name)
    }
}

/// All concepts reported under one taxonomy (`us-gaap`, `dei`, ...)
#[derive(Debug, Default)]
pub struct Taxonomy {
    pub concepts: HashMap<String, Concept>,
}

impl<'de> Deserialize<'de> for Taxonomy {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        lenient_map(deserializer).map(|concepts| Taxonomy { concepts })
    }
}

impl Taxonomy {
    pub fn concept(&self, name: &str) -> Option<&Concept> {
        self.concepts.get(name)
    }

    /// USD-denominated observations of a concept, if the concept reports any
    pub fn usd_observations(&self, concept: &str) -> Option<&[RawObservation]> {
        self.concept(concept)
            .and_then(|c| c.units.get("USD"))
            .map(|list| list.0.as_slice())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct Concept {
    #[serde(default, deserialize_with = "lenient_map")]
    pub units: BTreeMap<String, ObservationList>,
}

#[derive(Debug, Default)]
pub struct ObservationList(pub Vec<RawObservation>);

impl<'de> Deserialize<'de> for ObservationList {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let entries = match Value::deserialize(deserializer)? {
            Value::Array(items) => items
                .into_iter()
                .filter(Value::is_object)
                .filter_map(|item| serde_json::from_value(item).ok())
                .collect(),
            _ => Vec::new(),
        };
        Ok(ObservationList(entries))
    }
}

impl ObservationList {
    pub fn iter(&self) -> impl Iterator<Item = &RawObservation> {
        self.0.iter()
    }
}

/// One disclosed fact instance
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawObservation {
    #[serde(rename = "val", default, deserialize_with = "lenient")]
    pub value: Option<Number>,
    #[serde(default, deserialize_with = "lenient")]
    pub form: Option<String>,
    #[serde(rename = "fy", default, deserialize_with = "lenient")]
    pub fiscal_year: Option<i32>,
    #[serde(rename = "fp", default, deserialize_with = "lenient_period")]
    pub fiscal_period: Option<FiscalPeriod>,
    /// Aggregation window tag, e.g. `CY2023Q2` or `CY2023Q4I`
    #[serde(default, deserialize_with = "lenient")]
    pub frame: Option<String>,
}

/// Filer-declared period within a fiscal year
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FiscalPeriod {
    FY,
    Q1,
    Q2,
    Q3,
    Q4,
    Other(String),
}

impl FiscalPeriod {
    pub fn as_label(&self) -> &str {
        match self {
            FiscalPeriod::FY => "FY",
            FiscalPeriod::Q1 => "Q1",
            FiscalPeriod::Q2 => "Q2",
            FiscalPeriod::Q3 => "Q3",
            FiscalPeriod::Q4 => "Q4",
            FiscalPeriod::Other(label) => label,
        }
    }
}

impl From<&str> for FiscalPeriod {
    fn from(label: &str) -> Self {
        match label {
            "FY" => FiscalPeriod::FY,
            "Q1" => FiscalPeriod::Q1,
            "Q2" => FiscalPeriod::Q2,
            "Q3" => FiscalPeriod::Q3,
            "Q4" => FiscalPeriod::Q4,
            other => FiscalPeriod::Other(other.to_string()),
        }
    }
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

fn lenient_period<'de, D>(deserializer: D) -> Result<Option<FiscalPeriod>, D::Error>
where
    D: Deserializer<'de>,
{
    let label: Option<String> = lenient(deserializer)?;
    Ok(label.map(|l| FiscalPeriod::from(l.as_str())))
}

fn lenient_map<'de, D, M, V>(deserializer: D) -> Result<M, D::Error>
where
    D: Deserializer<'de>,
    M: Default + FromIterator<(String, V)>,
    V: DeserializeOwned,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Object(entries) => entries
            .into_iter()
            .filter_map(|(key, value)| serde_json::from_value(value).ok().map(|v| (key, v)))
            .collect(),
        _ => M::default(),
    })
}
