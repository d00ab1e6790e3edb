use std::io::Write;

use super::ChartRenderer;
use crate::error::RenderError;
use crate::series::Series;
use crate::tables::ComparisonTable;

const DEFAULT_BAR_WIDTH: usize = 40;

/// Draws horizontal text bar charts.
pub struct TerminalRenderer<W> {
    out: W,
    bar_width: usize,
}

impl TerminalRenderer<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            bar_width: DEFAULT_BAR_WIDTH,
        }
    }

    pub fn with_bar_width(mut self, bar_width: usize) -> Self {
        self.bar_width = bar_width.max(1);
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Bar for `value` scaled against `max`; negative values use `-`.
    fn bar(&self, value: f64, max: f64) -> String {
        if max <= 0.0 {
            return String::new();
        }
        let len = ((value.abs() / max) * self.bar_width as f64).round() as usize;
        let fill = if value < 0.0 { '-' } else { '#' };
        std::iter::repeat_n(fill, len.min(self.bar_width)).collect()
    }
}

impl<W: Write + Send> ChartRenderer for TerminalRenderer<W> {
    fn draw_series(&mut self, series: &Series, container: &str) -> Result<(), RenderError> {
        writeln!(self.out, "[{container}] {}", series.key)?;
        if series.is_empty() {
            writeln!(self.out, "  (no data)")?;
            return Ok(());
        }

        let label_width = series.values.iter().map(|p| p.label.len()).max().unwrap_or(0);
        let max = series
            .values
            .iter()
            .map(|p| p.value.abs())
            .fold(0.0_f64, f64::max);

        for point in &series.values {
            let bar = self.bar(point.value, max);
            writeln!(
                self.out,
                "  {:<label_width$} | {:<width$} {:>9.2}%",
                point.label,
                bar,
                point.value,
                width = self.bar_width
            )?;
        }
        Ok(())
    }

    fn draw_table(&mut self, table: &ComparisonTable, container: &str) -> Result<(), RenderError> {
        let header = table.header();
        let row = &table.row;
        let max = row.location.abs().max(row.city_average.abs());

        writeln!(self.out, "[{container}] {} (crimes per year)", row.category)?;
        for (label, value) in [(header[1], row.location), (header[2], row.city_average)] {
            let bar = self.bar(value, max);
            writeln!(
                self.out,
                "  {:<13} | {:<width$} {:>9.2}",
                label,
                bar,
                value,
                width = self.bar_width
            )?;
        }
        Ok(())
    }

    fn reveal(&mut self, _container: &str) -> Result<(), RenderError> {
        writeln!(self.out)?;
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::CategoryValue;
    use crate::tables::ComparisonRow;

    fn output(renderer: TerminalRenderer<Vec<u8>>) -> String {
        String::from_utf8(renderer.into_inner()).unwrap()
    }

    #[test]
    fn test_series_bars_scale_to_largest_magnitude() {
        let series = Series::from_category_values(&[
            CategoryValue {
                category: "Arson".to_string(),
                value: -50.0,
            },
            CategoryValue {
                category: "Theft".to_string(),
                value: 100.0,
            },
        ]);

        let mut renderer = TerminalRenderer::new(Vec::new()).with_bar_width(10);
        renderer.draw_series(&series, "chart1").unwrap();
        let text = output(renderer);

        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "[chart1] Crime types compared to city average");
        assert!(lines[1].contains("-----      "));
        assert!(lines[1].trim_end().ends_with("-50.00%"));
        assert!(lines[2].contains("##########"));
    }

    #[test]
    fn test_empty_series() {
        let series = Series::from_category_values(&[]);
        let mut renderer = TerminalRenderer::new(Vec::new());
        renderer.draw_series(&series, "chart1").unwrap();
        assert!(output(renderer).contains("(no data)"));
    }

    #[test]
    fn test_table_chart() {
        let table = ComparisonTable {
            row: ComparisonRow {
                category: "Burglary".to_string(),
                location: 0.0,
                city_average: 4.0,
            },
        };
        let mut renderer = TerminalRenderer::new(Vec::new()).with_bar_width(4);
        renderer.draw_table(&table, "burglary").unwrap();
        renderer.reveal("charts").unwrap();
        let text = output(renderer);

        assert!(text.starts_with("[burglary] Burglary (crimes per year)\n"));
        assert!(text.contains("Your location |      "));
        assert!(text.contains("City average  | ####"));
    }
}
