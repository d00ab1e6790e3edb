//! Validation of raw comparison payloads into explicit shapes.
//!
//! The statistics endpoint answers with one of two JSON shapes. Both are
//! checked here, before any reshaping, so the rest of the crate works with
//! typed values. Individual category values stay as raw [`Value`]s: whether a
//! value parses is decided per entry by the consumer.

use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::error::FetchError;

/// Category → signed percentage difference against the city average.
pub type PercentageMap = Map<String, Value>;

/// Per-location crime sums. Only the by-type breakdown is consumed; the
/// server may send other breakdowns alongside it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocationSums {
    #[serde(default)]
    pub by_type: BTreeMap<String, Value>,
}

/// Location sums and city averages for an explicit list of categories.
#[derive(Debug, Clone, Deserialize)]
pub struct CompositeComparison {
    pub location_sums: LocationSums,
    pub city_averages: BTreeMap<String, Value>,
    pub crime_types: Vec<String>,
}

#[derive(Debug, Clone)]
pub enum ComparisonResponse {
    Flat(PercentageMap),
    Composite(CompositeComparison),
}

const COMPOSITE_KEYS: [&str; 3] = ["location_sums", "city_averages", "crime_types"];

impl ComparisonResponse {
    /// Classifies a decoded payload.
    ///
    /// An object carrying all three composite keys must be a well-formed
    /// composite; any other object, including one with a category that
    /// happens to share a composite key's name, is a flat percentage mapping.
    pub fn from_value(value: Value) -> Result<Self, FetchError> {
        let map = match value {
            Value::Object(map) => map,
            other => {
                return Err(FetchError::Malformed(format!(
                    "expected a JSON object, got {}",
                    json_kind(&other)
                )));
            }
        };

        if COMPOSITE_KEYS.iter().all(|k| map.contains_key(*k)) {
            let composite: CompositeComparison = serde_json::from_value(Value::Object(map))
                .map_err(|e| FetchError::Malformed(format!("composite comparison: {e}")))?;
            return Ok(ComparisonResponse::Composite(composite));
        }

        Ok(ComparisonResponse::Flat(map))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ComparisonResponse::Flat(_) => "flat",
            ComparisonResponse::Composite(_) => "composite",
        }
    }

    pub fn into_flat(self) -> Result<PercentageMap, FetchError> {
        match self {
            ComparisonResponse::Flat(map) => Ok(map),
            other => Err(FetchError::Malformed(format!(
                "expected a flat percentage mapping, got a {} response",
                other.kind()
            ))),
        }
    }

    pub fn into_composite(self) -> Result<CompositeComparison, FetchError> {
        match self {
            ComparisonResponse::Composite(c) => Ok(c),
            other => Err(FetchError::Malformed(format!(
                "expected a composite comparison, got a {} response",
                other.kind()
            ))),
        }
    }
}

/// Reads a raw value as a finite number.
///
/// JSON numbers and numeric strings (surrounding whitespace allowed) parse;
/// everything else, including `"NaN"` and infinities, does not.
pub fn parse_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
