//! Model comparison dashboard.
//!
//! Pipeline: [`DashboardState::load`] pulls the records once (falling back to
//! the built-in sample set when the backend has nothing usable), then
//! [`DashboardModel::build`] ranks them by macro F1 a single time and derives
//! every chart and the table from that one ranked sequence. [`render`] pushes
//! the result into a [`DashboardView`].
//!
//! Views: [`TerminalDashboard`] for the CLI, [`HtmlDashboard`] for the web
//! server and `--html` export.

mod html;
mod terminal;

use crate::analytics::{Event, EventKind, EventLogger};
use crate::api::ModelSource;
use crate::models::{self, ModelRecord};

pub use html::HtmlDashboard;
pub use terminal::TerminalDashboard;

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// Where the active record set came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    /// Records returned by the backend.
    Live,
    /// The built-in sample set, because the backend data was unavailable.
    Sample { reason: String },
}

impl DataSource {
    pub fn is_sample(&self) -> bool {
        matches!(self, Self::Sample { .. })
    }
}

/// The active record set for one dashboard render.
///
/// Holds the records in source order; ranking happens in
/// [`DashboardModel::build`] on a copy.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardState {
    records: Vec<ModelRecord>,
    source: DataSource,
}

impl DashboardState {
    /// Fetch records once; substitute the sample set if the request fails,
    /// returns nothing, or returns a record that breaks the range invariants.
    ///
    /// The fallback is logged, never returned as an error.
    pub fn load(source: &dyn ModelSource, logger: &EventLogger) -> Self {
        let reason = match source.fetch_models() {
            Ok(records) if records.is_empty() => "backend returned no records".to_string(),
            Ok(records) => match records.iter().try_for_each(ModelRecord::validate) {
                Ok(()) => return Self::live(records),
                Err(invalid) => format!("invalid record: {invalid}"),
            },
            Err(e) => e.to_string(),
        };

        eprintln!("[textclass] model data unavailable ({reason}); using sample data");
        logger.record(&Event::new(EventKind::SampleFallback, false).with_detail(reason.clone()));

        Self::sample(reason)
    }

    pub fn live(records: Vec<ModelRecord>) -> Self {
        Self {
            records,
            source: DataSource::Live,
        }
    }

    pub fn sample(reason: impl Into<String>) -> Self {
        Self {
            records: models::sample_records(),
            source: DataSource::Sample {
                reason: reason.into(),
            },
        }
    }

    /// Records in the order they were received.
    pub fn records(&self) -> &[ModelRecord] {
        &self.records
    }

    pub fn source(&self) -> &DataSource {
        &self.source
    }
}

// ---------------------------------------------------------------------------
// Derived view model
// ---------------------------------------------------------------------------

/// An RGB colour shared by the terminal and HTML views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub fn hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

const INDIGO: Rgb = Rgb(99, 102, 241);
const EMERALD: Rgb = Rgb(16, 185, 129);
const AMBER: Rgb = Rgb(245, 158, 11);
const PERIWINKLE: Rgb = Rgb(129, 140, 248);

/// A single-series bar chart. `labels` and `values` are index-aligned.
#[derive(Debug, Clone, PartialEq)]
pub struct BarChart {
    pub id: &'static str,
    pub title: &'static str,
    pub series_label: &'static str,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    /// Fixed axis maximum; `None` scales to the largest value.
    pub max: Option<f64>,
    pub color: Rgb,
}

impl BarChart {
    /// Axis maximum: the fixed cap, else the largest value (never zero).
    pub fn axis_max(&self) -> f64 {
        self.max.unwrap_or_else(|| {
            let largest = self.values.iter().copied().fold(0.0_f64, f64::max);
            if largest > 0.0 { largest } else { 1.0 }
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterPoint {
    pub label: String,
    /// Training time in seconds.
    pub x: f64,
    /// Macro F1.
    pub y: f64,
}

impl ScatterPoint {
    pub fn tooltip(&self) -> String {
        format!("{}: F1={:.4}, Time={:.2}s", self.label, self.y, self.x)
    }
}

/// Training time (x) against macro F1 (y), one point per model.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterChart {
    pub id: &'static str,
    pub title: &'static str,
    pub x_label: &'static str,
    pub y_label: &'static str,
    pub points: Vec<ScatterPoint>,
    pub color: Rgb,
}

impl ScatterChart {
    pub fn x_max(&self) -> f64 {
        let largest = self.points.iter().map(|p| p.x).fold(0.0_f64, f64::max);
        if largest > 0.0 { largest } else { 1.0 }
    }

    /// Macro F1 is capped at 1.
    pub fn y_max(&self) -> f64 {
        1.0
    }
}

/// One row of the ranked comparison table, already formatted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    /// Zero-based rank.
    pub rank: usize,
    pub badge: String,
    pub name: String,
    pub f1_macro: String,
    pub f1_weighted: String,
    pub accuracy: String,
    pub training_time: String,
}

impl TableRow {
    /// Ranks 1–3 get a medal badge.
    pub fn is_podium(&self) -> bool {
        self.rank < 3
    }
}

/// Everything a view needs, derived from one ranked sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardModel {
    pub ranked: Vec<ModelRecord>,
    pub bars: Vec<BarChart>,
    pub scatter: ScatterChart,
    pub rows: Vec<TableRow>,
    pub source: DataSource,
}

impl DashboardModel {
    pub fn build(state: &DashboardState) -> Self {
        let ranked = models::sorted_by_f1_macro(state.records());
        let labels: Vec<String> = ranked.iter().map(|r| r.name.clone()).collect();

        let bar = |id, title, series_label, max, color, value: fn(&ModelRecord) -> f64| BarChart {
            id,
            title,
            series_label,
            labels: labels.clone(),
            values: ranked.iter().map(value).collect(),
            max,
            color,
        };

        let bars = vec![
            bar("f1Chart", "F1-Score (Macro)", "F1-Score (Macro)", Some(1.0), INDIGO, |r| {
                r.f1_macro
            }),
            bar("accuracyChart", "Accuracy", "Accuracy", Some(1.0), EMERALD, |r| {
                r.accuracy
            }),
            bar(
                "timeChart",
                "Training Time",
                "Training Time (seconds)",
                None,
                AMBER,
                |r| r.training_time_secs,
            ),
        ];

        let scatter = ScatterChart {
            id: "scatterChart",
            title: "F1-Score vs Training Time",
            x_label: "Training Time (seconds)",
            y_label: "F1-Score (Macro)",
            points: ranked
                .iter()
                .map(|r| ScatterPoint {
                    label: r.name.clone(),
                    x: r.training_time_secs,
                    y: r.f1_macro,
                })
                .collect(),
            color: PERIWINKLE,
        };

        let rows = ranked
            .iter()
            .enumerate()
            .map(|(rank, r)| TableRow {
                rank,
                badge: models::rank_badge(rank),
                name: r.name.clone(),
                f1_macro: models::format_score(r.f1_macro),
                f1_weighted: models::format_score(r.f1_weighted),
                accuracy: models::format_score(r.accuracy),
                training_time: models::format_seconds(r.training_time_secs),
            })
            .collect();

        Self {
            ranked,
            bars,
            scatter,
            rows,
            source: state.source().clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// View
// ---------------------------------------------------------------------------

/// Render target for the dashboard.
///
/// Drawing a chart whose `id` was drawn before replaces it; `replace_table`
/// discards all previous rows. Rendering the same model twice therefore
/// leaves the view unchanged.
pub trait DashboardView {
    fn draw_bar_chart(&mut self, chart: &BarChart);
    fn draw_scatter(&mut self, chart: &ScatterChart);
    fn replace_table(&mut self, rows: &[TableRow]);
    /// Shown when the sample set is active. Default: nothing.
    fn note_source(&mut self, _source: &DataSource) {}
}

pub fn render(model: &DashboardModel, view: &mut impl DashboardView) {
    view.note_source(&model.source);
    for chart in &model.bars {
        view.draw_bar_chart(chart);
    }
    view.draw_scatter(&model.scatter);
    view.replace_table(&model.rows);
}

/// Store `section` under `id`, replacing an earlier one in place.
fn upsert<T>(sections: &mut Vec<(String, T)>, id: &str, section: T) {
    match sections.iter_mut().find(|(existing, _)| existing == id) {
        Some(slot) => slot.1 = section,
        None => sections.push((id.to_string(), section)),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
