//! Reshapes a flat percentage mapping into ordered category values.

use serde::Serialize;
use tracing::debug;

use crate::response::{PercentageMap, parse_number};

/// A category and its parsed, finite value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryValue {
    pub category: String,
    pub value: f64,
}

/// Sorts categories by name and keeps those whose value parses as a number.
///
/// Unparseable values drop their category entirely rather than defaulting to
/// zero, so a garbled upstream entry never shows up as a real bar.
pub fn normalize(raw: &PercentageMap) -> Vec<CategoryValue> {
    let mut entries: Vec<_> = raw.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));

    entries
        .into_iter()
        .filter_map(|(category, raw_value)| match parse_number(raw_value) {
            Some(value) => Some(CategoryValue {
                category: category.clone(),
                value,
            }),
            None => {
                debug!(category = %category, raw = %raw_value, "Skipping unparseable value");
                None
            }
        })
        .collect()
}
