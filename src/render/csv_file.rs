//! Appends chart data to a CSV file, one row per bar.

use chrono::{DateTime, Utc};
use csv::WriterBuilder;
use serde::Serialize;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::ChartRenderer;
use crate::error::RenderError;
use crate::series::Series;
use crate::tables::ComparisonTable;

#[derive(Debug, Serialize)]
struct ChartRecord<'a> {
    timestamp: DateTime<Utc>,
    container: &'a str,
    crime_type: &'a str,
    /// Percentage difference, for series charts.
    value: Option<f64>,
    your_location: Option<f64>,
    city_average: Option<f64>,
}

pub struct CsvRenderer {
    path: PathBuf,
}

impl CsvRenderer {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates the file with headers if it does not already exist.
    fn append(&self, records: &[ChartRecord<'_>]) -> Result<(), RenderError> {
        let file_exists = Path::new(&self.path).exists();
        debug!(path = %self.path.display(), file_exists, rows = records.len(), "Appending CSV rows");

        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)?;

        let mut writer = WriterBuilder::new()
            .has_headers(!file_exists)
            .from_writer(file);

        for record in records {
            writer.serialize(record)?;
        }
        writer.flush()?;

        Ok(())
    }
}

impl ChartRenderer for CsvRenderer {
    fn draw_series(&mut self, series: &Series, container: &str) -> Result<(), RenderError> {
        let timestamp = Utc::now();
        let records: Vec<_> = series
            .values
            .iter()
            .map(|point| ChartRecord {
                timestamp,
                container,
                crime_type: &point.label,
                value: Some(point.value),
                your_location: None,
                city_average: None,
            })
            .collect();
        self.append(&records)
    }

    fn draw_table(&mut self, table: &ComparisonTable, container: &str) -> Result<(), RenderError> {
        self.append(&[ChartRecord {
            timestamp: Utc::now(),
            container,
            crime_type: &table.row.category,
            value: None,
            your_location: Some(table.row.location),
            city_average: Some(table.row.city_average),
        }])
    }

    fn reveal(&mut self, _container: &str) -> Result<(), RenderError> {
        Ok(())
    }
}
