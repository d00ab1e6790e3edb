use serde::Serialize;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

use super::ChartRenderer;
use crate::error::RenderError;
use crate::series::Series;
use crate::tables::ComparisonTable;

/// Lists what was drawn under a revealed container.
#[derive(Debug, Serialize)]
struct Manifest<'a> {
    container: &'a str,
    charts: &'a [String],
}

/// Writes each chart's input, exactly as a browser charting library would
/// receive it, to `<dir>/<container>.json`.
///
/// Revealing a container writes `<dir>/<container>.manifest.json` naming the
/// charts drawn since the previous reveal.
pub struct JsonRenderer {
    dir: PathBuf,
    pending: Vec<String>,
}

impl JsonRenderer {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, RenderError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            pending: Vec::new(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Writes `<dir>/<name>.json`; `name` must stay inside `dir`.
    fn write(&self, name: &str, value: &impl Serialize) -> Result<(), RenderError> {
        let file_name = format!("{name}.json");
        let mut components = Path::new(&file_name).components();
        if !matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        ) {
            return Err(RenderError::InvalidContainer(name.to_string()));
        }

        let path = self.dir.join(file_name);
        debug!(path = %path.display(), "Writing chart data");
        fs::write(path, serde_json::to_vec_pretty(value)?)?;
        Ok(())
    }
}

impl ChartRenderer for JsonRenderer {
    fn draw_series(&mut self, series: &Series, container: &str) -> Result<(), RenderError> {
        self.write(container, &series.to_chart_json())?;
        self.pending.push(container.to_string());
        Ok(())
    }

    fn draw_table(&mut self, table: &ComparisonTable, container: &str) -> Result<(), RenderError> {
        self.write(container, &table.to_rows())?;
        self.pending.push(container.to_string());
        Ok(())
    }

    fn reveal(&mut self, container: &str) -> Result<(), RenderError> {
        let charts = std::mem::take(&mut self.pending);
        self.write(
            &format!("{container}.manifest"),
            &Manifest {
                container,
                charts: &charts,
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RenderDispatcher;
    use crate::tables::{ComparisonRow, build_tables};
    use serde_json::{Value, json};
    use std::collections::BTreeMap;
    use std::env;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = env::temp_dir().join(name);
        let _ = fs::remove_dir_all(&dir); // clean up any prior run
        dir
    }

    fn read(path: PathBuf) -> Value {
        serde_json::from_slice(&fs::read(path).unwrap()).unwrap()
    }

    #[test]
    fn test_writes_table_and_manifest() {
        let dir = temp_dir("crime_compare_json_tables");
        let mut renderer = JsonRenderer::new(&dir).unwrap();

        let table = ComparisonTable {
            row: ComparisonRow {
                category: "Arson".to_string(),
                location: 0.0,
                city_average: 1.5,
            },
        };
        renderer.draw_table(&table, "arson").unwrap();
        renderer.reveal("charts").unwrap();

        assert_eq!(
            read(dir.join("arson.json")),
            json!([["Crime type", "Your location", "City average"], ["Arson", 0.0, 1.5]])
        );
        assert_eq!(
            read(dir.join("charts.manifest.json")),
            json!({"container": "charts", "charts": ["arson"]})
        );

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_rejects_container_outside_dir() {
        let dir = temp_dir("crime_compare_json_outside");
        let mut renderer = JsonRenderer::new(dir.join("out")).unwrap();
        let series = Series::from_category_values(&[]);

        for container in ["../escaped", "a/b", "/tmp/abs"] {
            let err = renderer.draw_series(&series, container).unwrap_err();
            assert!(matches!(err, RenderError::InvalidContainer(_)));
        }
        assert!(!dir.join("escaped.json").exists());
        assert!(!dir.join("out").join("a").exists());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_hostile_categories_stay_in_output_dir() {
        let dir = temp_dir("crime_compare_json_hostile");
        let out = dir.join("out");
        let averages: BTreeMap<String, Value> = ["../Escaped", "Larceny/Theft", "Arson"]
            .iter()
            .map(|c| (c.to_string(), json!(1.0)))
            .collect();
        let categories: Vec<String> = averages.keys().cloned().collect();
        let tables = build_tables(&BTreeMap::new(), &averages, &categories);

        let mut dispatcher = RenderDispatcher::new(JsonRenderer::new(&out).unwrap());
        dispatcher.render_tables(&tables).unwrap();

        assert!(!dir.join("escaped.json").exists());
        assert!(out.join("escaped.json").exists());
        assert!(out.join("larceny-theft.json").exists());
        assert!(out.join("arson.json").exists());
        assert_eq!(
            read(out.join("charts.manifest.json")),
            json!({"container": "charts", "charts": ["escaped", "arson", "larceny-theft"]})
        );

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_reveal_resets_pending() {
        let dir = temp_dir("crime_compare_json_reveal");
        let mut renderer = JsonRenderer::new(&dir).unwrap();

        renderer
            .draw_series(&Series::from_category_values(&[]), "chart1")
            .unwrap();
        renderer.reveal("comparison").unwrap();
        renderer.reveal("comparison").unwrap();

        assert_eq!(
            read(dir.join("comparison.manifest.json")),
            json!({"container": "comparison", "charts": []})
        );

        fs::remove_dir_all(&dir).unwrap();
    }
}
