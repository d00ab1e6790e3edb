//! Per-category comparison tables for the spreadsheet-style chart input.

use serde_json::{Value, json};
use std::collections::BTreeMap;
use tracing::debug;

use crate::response::{CompositeComparison, parse_number};

pub const TABLE_HEADER: [&str; 3] = ["Crime type", "Your location", "City average"];

/// One category's location value next to the city average.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonRow {
    pub category: String,
    pub location: f64,
    pub city_average: f64,
}

/// A header row followed by a single data row.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonTable {
    pub row: ComparisonRow,
}

impl ComparisonTable {
    pub fn header(&self) -> [&'static str; 3] {
        TABLE_HEADER
    }

    /// The 2-D array a table charting library consumes, header first.
    pub fn to_rows(&self) -> Vec<Vec<Value>> {
        vec![
            TABLE_HEADER.iter().map(|h| json!(h)).collect(),
            vec![
                json!(self.row.category),
                json!(self.row.location),
                json!(self.row.city_average),
            ],
        ]
    }
}

/// Builds one table per category, keyed and ordered by category name.
///
/// A category missing from `location_sums` (or with an unparseable sum)
/// contributes `0.0`. A category without a usable city average is left out:
/// there is nothing to compare against.
pub fn build_tables(
    location_sums: &BTreeMap<String, Value>,
    city_averages: &BTreeMap<String, Value>,
    categories: &[String],
) -> BTreeMap<String, ComparisonTable> {
    let mut sorted: Vec<&String> = categories.iter().collect();
    sorted.sort();
    sorted.dedup();

    let mut tables = BTreeMap::new();
    for category in sorted {
        let location = location_sums
            .get(category)
            .and_then(parse_number)
            .unwrap_or(0.0);

        let Some(city_average) = city_averages.get(category).and_then(parse_number) else {
            debug!(category = %category, "Skipping category without a city average");
            continue;
        };

        tables.insert(
            category.clone(),
            ComparisonTable {
                row: ComparisonRow {
                    category: category.clone(),
                    location,
                    city_average,
                },
            },
        );
    }

    tables
}

/// [`build_tables`] over a validated composite response.
pub fn tables_from_composite(composite: &CompositeComparison) -> BTreeMap<String, ComparisonTable> {
    build_tables(
        &composite.location_sums.by_type,
        &composite.city_averages,
        &composite.crime_types,
    )
}
