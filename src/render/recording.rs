use serde_json::Value;

use super::ChartRenderer;
use crate::error::RenderError;
use crate::series::Series;
use crate::tables::ComparisonTable;

#[derive(Debug, Clone, PartialEq)]
pub enum RenderCall {
    Series { container: String, series: Series },
    Table { container: String, rows: Vec<Vec<Value>> },
    Reveal(String),
}

/// Remembers every call instead of drawing.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub calls: Vec<RenderCall>,
}

impl RecordingRenderer {
    /// Number of charts drawn, reveals excluded.
    pub fn draw_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| !matches!(c, RenderCall::Reveal(_)))
            .count()
    }
}

impl ChartRenderer for RecordingRenderer {
    fn draw_series(&mut self, series: &Series, container: &str) -> Result<(), RenderError> {
        self.calls.push(RenderCall::Series {
            container: container.to_string(),
            series: series.clone(),
        });
        Ok(())
    }

    fn draw_table(&mut self, table: &ComparisonTable, container: &str) -> Result<(), RenderError> {
        self.calls.push(RenderCall::Table {
            container: container.to_string(),
            rows: table.to_rows(),
        });
        Ok(())
    }

    fn reveal(&mut self, container: &str) -> Result<(), RenderError> {
        self.calls.push(RenderCall::Reveal(container.to_string()));
        Ok(())
    }
}
