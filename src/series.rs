//! The labelled-series chart input: `[{key, values: [{label, value}]}]`.

use serde::Serialize;

use crate::normalize::CategoryValue;

pub const COMPARISON_SERIES_KEY: &str = "Crime types compared to city average";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub key: String,
    pub values: Vec<SeriesPoint>,
}

impl Series {
    /// Builds the comparison series, preserving the order of `values`.
    pub fn from_category_values(values: &[CategoryValue]) -> Self {
        Self {
            key: COMPARISON_SERIES_KEY.to_string(),
            values: values
                .iter()
                .map(|v| SeriesPoint {
                    label: v.category.clone(),
                    value: v.value,
                })
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The shape a series charting library consumes: a list of series.
    pub fn to_chart_json(&self) -> serde_json::Value {
        serde_json::json!([self])
    }
}
