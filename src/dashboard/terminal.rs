use colored::Colorize;

use super::{BarChart, DashboardView, DataSource, Rgb, ScatterChart, TableRow, upsert};

/// Width of the longest bar, in cells.
const BAR_WIDTH: usize = 40;
/// Scatter plot grid size.
const PLOT_COLS: usize = 56;
const PLOT_ROWS: usize = 14;
/// Model names are cut to this width in chart gutters.
const LABEL_WIDTH: usize = 24;

/// Renders the dashboard as coloured text.
///
/// Sections are kept by id so that re-rendering replaces rather than
/// appends; [`TerminalDashboard::output`] joins them in draw order.
#[derive(Debug, Default)]
pub struct TerminalDashboard {
    notice: Option<String>,
    charts: Vec<(String, String)>,
    table: String,
}

impl TerminalDashboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn output(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("{}\n", "Model Performance Comparison".bold().cyan()));
        out.push_str(&format!("{}\n", "=".repeat(60)));
        if let Some(notice) = &self.notice {
            out.push_str(notice);
            out.push('\n');
        }
        for (_, chart) in &self.charts {
            out.push('\n');
            out.push_str(chart);
        }
        out.push('\n');
        out.push_str(&self.table);
        out
    }
}

impl DashboardView for TerminalDashboard {
    fn draw_bar_chart(&mut self, chart: &BarChart) {
        let max = chart.axis_max();
        let mut out = format!("{}\n", chart.series_label.bold().cyan());

        for (label, &value) in chart.labels.iter().zip(&chart.values) {
            let cells = bar_cells(value, max, BAR_WIDTH);
            let bar = "█".repeat(cells);
            let Rgb(r, g, b) = chart.color;
            let shown = if chart.max.is_some() {
                format!("{value:.4}")
            } else {
                format!("{value:.2}s")
            };
            out.push_str(&format!(
                "  {:<width$} {}{} {}\n",
                truncate(label, LABEL_WIDTH),
                bar.truecolor(r, g, b),
                " ".repeat(BAR_WIDTH - cells),
                shown,
                width = LABEL_WIDTH,
            ));
        }

        upsert(&mut self.charts, chart.id, out);
    }

    fn draw_scatter(&mut self, chart: &ScatterChart) {
        let mut grid = vec![vec![' '; PLOT_COLS]; PLOT_ROWS];
        let (x_max, y_max) = (chart.x_max(), chart.y_max());

        for (i, point) in chart.points.iter().enumerate() {
            let col = scale(point.x, x_max, PLOT_COLS);
            let row = PLOT_ROWS - 1 - scale(point.y, y_max, PLOT_ROWS);
            grid[row][col] = marker(i);
        }

        let mut out = format!(
            "{}\n",
            format!("{} vs {}", chart.y_label, chart.x_label).bold().cyan()
        );
        for (i, row) in grid.iter().enumerate() {
            let axis = if i == 0 {
                format!("{y_max:>4.1}")
            } else if i == PLOT_ROWS - 1 {
                format!("{:>4.1}", 0.0)
            } else {
                "    ".to_string()
            };
            let line: String = row.iter().collect();
            let Rgb(r, g, b) = chart.color;
            out.push_str(&format!("  {axis} │{}\n", line.truecolor(r, g, b)));
        }
        out.push_str(&format!("       └{}\n", "─".repeat(PLOT_COLS)));
        out.push_str(&format!(
            "        0{:>width$}\n",
            format!("{x_max:.2}s"),
            width = PLOT_COLS - 1
        ));

        for (i, point) in chart.points.iter().enumerate() {
            out.push_str(&format!("    {} {}\n", marker(i), point.tooltip().dimmed()));
        }

        upsert(&mut self.charts, chart.id, out);
    }

    fn replace_table(&mut self, rows: &[TableRow]) {
        let mut out = format!("{}\n", "Detailed Model Metrics".bold().cyan());
        out.push_str(&format!(
            "  {:<5} {:<26} {:>10} {:>13} {:>10} {:>10}\n",
            "Rank", "Model", "F1 (Macro)", "F1 (Weighted)", "Accuracy", "Time"
        ));
        out.push_str(&format!("  {}\n", "-".repeat(79)));

        for row in rows {
            let badge = format!("{:<5}", row.badge);
            let badge = match row.rank {
                0 => badge.yellow().bold(),
                1 => badge.white().bold(),
                2 => badge.truecolor(205, 127, 50).bold(),
                _ => badge.normal(),
            };
            let line = format!(
                "{:<26} {:>10} {:>13} {:>10} {:>10}",
                truncate(&row.name, 26),
                row.f1_macro,
                row.f1_weighted,
                row.accuracy,
                row.training_time,
            );
            if row.rank % 2 == 0 {
                out.push_str(&format!("  {badge} {line}\n"));
            } else {
                out.push_str(&format!("  {badge} {}\n", line.dimmed()));
            }
        }

        self.table = out;
    }

    fn note_source(&mut self, source: &DataSource) {
        self.notice = match source {
            DataSource::Live => None,
            DataSource::Sample { .. } => Some(format!(
                "{}",
                "Showing built-in sample data (backend data unavailable).".yellow()
            )),
        };
    }
}

/// Number of filled cells for `value` on a `0..=max` axis.
fn bar_cells(value: f64, max: f64, width: usize) -> usize {
    if max <= 0.0 || !value.is_finite() {
        return 0;
    }
    let ratio = (value / max).clamp(0.0, 1.0);
    (ratio * width as f64).round() as usize
}

/// Map `value` on `0..=max` to a cell index in `0..cells`.
fn scale(value: f64, max: f64, cells: usize) -> usize {
    let ratio = if max > 0.0 { (value / max).clamp(0.0, 1.0) } else { 0.0 };
    ((ratio * (cells - 1) as f64).round() as usize).min(cells - 1)
}

/// Plot marker for the i-th ranked model: `1`..`9`, then `+`.
fn marker(i: usize) -> char {
    char::from_digit((i + 1) as u32, 10)
        .filter(|_| i < 9)
        .unwrap_or('+')
}

/// Truncate to `max_len` characters, appending "…" if cut.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{kept}…")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
