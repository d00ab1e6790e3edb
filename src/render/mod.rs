//! Hands finished chart inputs to a charting collaborator.
//!
//! [`ChartRenderer`] is the capability "given chart data and a mount point,
//! draw a chart". [`RenderDispatcher`] only decides where each chart goes and
//! reveals the containers once every draw has completed.

mod csv_file;
mod json_file;
mod recording;
mod terminal;

pub use csv_file::CsvRenderer;
pub use json_file::JsonRenderer;
pub use recording::{RecordingRenderer, RenderCall};
pub use terminal::TerminalRenderer;

use std::collections::{BTreeMap, HashSet};

use crate::error::RenderError;
use crate::series::Series;
use crate::tables::ComparisonTable;

/// Mount point of the single comparison series.
pub const SERIES_CONTAINER: &str = "chart1";
/// Container revealed once the series is drawn.
pub const SERIES_PARENT: &str = "comparison";
/// Container the per-category table charts are mounted under.
pub const TABLES_PARENT: &str = "charts";

pub trait ChartRenderer: Send {
    fn draw_series(&mut self, series: &Series, container: &str) -> Result<(), RenderError>;

    fn draw_table(&mut self, table: &ComparisonTable, container: &str) -> Result<(), RenderError>;

    /// Makes a container, hidden until now, visible.
    fn reveal(&mut self, container: &str) -> Result<(), RenderError>;
}

macro_rules! forward_renderer {
    ($ty:ty) => {
        impl<R: ChartRenderer + ?Sized> ChartRenderer for $ty {
            fn draw_series(&mut self, series: &Series, container: &str) -> Result<(), RenderError> {
                (**self).draw_series(series, container)
            }

            fn draw_table(
                &mut self,
                table: &ComparisonTable,
                container: &str,
            ) -> Result<(), RenderError> {
                (**self).draw_table(table, container)
            }

            fn reveal(&mut self, container: &str) -> Result<(), RenderError> {
                (**self).reveal(container)
            }
        }
    };
}

forward_renderer!(Box<R>);
forward_renderer!(&mut R);

const FALLBACK_CONTAINER: &str = "chart";

/// Container id for a category: ASCII letters and digits lower-cased, every
/// other run of characters collapsed to a single `-`, none at either end.
///
/// Ids end up as file names, so nothing else may survive.
pub fn container_id(category: &str) -> String {
    let mut id = String::with_capacity(category.len());
    let mut pending_dash = false;
    for c in category.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !id.is_empty() {
                id.push('-');
            }
            pending_dash = false;
            id.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    if id.is_empty() {
        id.push_str(FALLBACK_CONTAINER);
    }
    id
}

pub struct RenderDispatcher<R> {
    renderer: R,
}

impl<R: ChartRenderer> RenderDispatcher<R> {
    pub fn new(renderer: R) -> Self {
        Self { renderer }
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn into_inner(self) -> R {
        self.renderer
    }

    pub fn render_series(&mut self, series: &Series) -> Result<(), RenderError> {
        self.renderer.draw_series(series, SERIES_CONTAINER)?;
        self.renderer.reveal(SERIES_PARENT)
    }

    /// Draws one chart per table, in key order, then reveals the parent.
    ///
    /// Categories whose ids collide get `-2`, `-3`, ... so every table keeps
    /// its own container.
    pub fn render_tables(
        &mut self,
        tables: &BTreeMap<String, ComparisonTable>,
    ) -> Result<(), RenderError> {
        let mut used = HashSet::new();
        for (category, table) in tables {
            let base = container_id(category);
            let mut container = base.clone();
            let mut n = 1;
            while !used.insert(container.clone()) {
                n += 1;
                container = format!("{base}-{n}");
            }
            self.renderer.draw_table(table, &container)?;
        }
        self.renderer.reveal(TABLES_PARENT)
    }
}
