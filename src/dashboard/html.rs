//! Self-contained HTML rendering of the dashboard.
//!
//! Charts are inline SVG, so the page needs no scripts or external assets.

use std::fmt::Write;

use super::{BarChart, DashboardView, DataSource, ScatterChart, TableRow, upsert};

const CHART_W: f64 = 640.0;
const CHART_H: f64 = 320.0;
const PAD_LEFT: f64 = 48.0;
const PAD_RIGHT: f64 = 16.0;
const PAD_TOP: f64 = 16.0;
/// Room for the 45° rotated model names under bar charts.
const PAD_BOTTOM: f64 = 120.0;
const Y_TICKS: usize = 5;

/// Collects chart SVGs and table rows, then emits one HTML page.
#[derive(Debug, Default)]
pub struct HtmlDashboard {
    notice: Option<String>,
    charts: Vec<(String, String)>,
    table_body: String,
}

impl HtmlDashboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// The markup of one drawn chart, by element id.
    pub fn chart(&self, id: &str) -> Option<&str> {
        self.charts
            .iter()
            .find(|(existing, _)| existing == id)
            .map(|(_, svg)| svg.as_str())
    }

    /// Current `<tbody>` contents.
    pub fn table_body(&self) -> &str {
        &self.table_body
    }

    pub fn to_html(&self) -> String {
        let mut cards = String::new();
        for (_, svg) in &self.charts {
            cards.push_str(svg);
        }
        let notice = self
            .notice
            .as_deref()
            .map(|n| format!(r#"<p class="notice">{}</p>"#, escape(n)))
            .unwrap_or_default();

        fill_template(
            PAGE_TEMPLATE,
            &[
                ("notice", notice.as_str()),
                ("charts", cards.as_str()),
                ("rows", self.table_body.as_str()),
            ],
        )
    }
}

impl DashboardView for HtmlDashboard {
    fn draw_bar_chart(&mut self, chart: &BarChart) {
        upsert(&mut self.charts, chart.id, bar_chart_svg(chart));
    }

    fn draw_scatter(&mut self, chart: &ScatterChart) {
        upsert(&mut self.charts, chart.id, scatter_svg(chart));
    }

    fn replace_table(&mut self, rows: &[TableRow]) {
        let mut body = String::new();
        for row in rows {
            let class = if row.is_podium() {
                format!("rank-badge rank-{}", row.rank + 1)
            } else {
                "rank-badge".to_string()
            };
            let _ = write!(
                body,
                "<tr><td><span class=\"{class}\">{}</span></td><td><strong>{}</strong></td>\
                 <td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                escape(&row.badge),
                escape(&row.name),
                row.f1_macro,
                row.f1_weighted,
                row.accuracy,
                row.training_time,
            );
        }
        self.table_body = body;
    }

    fn note_source(&mut self, source: &DataSource) {
        self.notice = match source {
            DataSource::Live => None,
            DataSource::Sample { .. } => {
                Some("Showing built-in sample data (backend data unavailable).".to_string())
            }
        };
    }
}

// ---------------------------------------------------------------------------
// SVG builders
// ---------------------------------------------------------------------------

fn bar_chart_svg(chart: &BarChart) -> String {
    let max = chart.axis_max();
    let plot_w = CHART_W - PAD_LEFT - PAD_RIGHT;
    let plot_h = CHART_H - PAD_TOP - PAD_BOTTOM;
    let base_y = PAD_TOP + plot_h;
    let slot = plot_w / chart.values.len().max(1) as f64;
    let color = chart.color.hex();

    let mut svg = open_card(chart.id, chart.title);
    y_axis(&mut svg, max, plot_w, plot_h);

    for (i, (label, &value)) in chart.labels.iter().zip(&chart.values).enumerate() {
        let h = (value / max).clamp(0.0, 1.0) * plot_h;
        let x = PAD_LEFT + i as f64 * slot + slot * 0.15;
        let w = slot * 0.7;
        let _ = write!(
            svg,
            r#"<rect x="{x:.1}" y="{:.1}" width="{w:.1}" height="{h:.1}" fill="{color}" fill-opacity="0.8" stroke="{color}" stroke-width="2"><title>{}: {value}</title></rect>"#,
            base_y - h,
            escape(label),
        );
        let cx = x + w / 2.0;
        let ly = base_y + 12.0;
        let _ = write!(
            svg,
            r#"<text x="{cx:.1}" y="{ly:.1}" transform="rotate(45 {cx:.1} {ly:.1})" class="tick">{}</text>"#,
            escape(label),
        );
    }

    close_card(&mut svg);
    svg
}

fn scatter_svg(chart: &ScatterChart) -> String {
    let (x_max, y_max) = (chart.x_max(), chart.y_max());
    let plot_w = CHART_W - PAD_LEFT - PAD_RIGHT;
    let plot_h = CHART_H - PAD_TOP - PAD_BOTTOM;
    let color = chart.color.hex();

    let mut svg = open_card(chart.id, chart.title);
    y_axis(&mut svg, y_max, plot_w, plot_h);

    for point in &chart.points {
        let cx = PAD_LEFT + (point.x / x_max).clamp(0.0, 1.0) * plot_w;
        let cy = PAD_TOP + plot_h - (point.y / y_max).clamp(0.0, 1.0) * plot_h;
        let _ = write!(
            svg,
            r#"<circle cx="{cx:.1}" cy="{cy:.1}" r="8" fill="{color}" fill-opacity="0.8" stroke="{color}"><title>{}</title></circle>"#,
            escape(&point.tooltip()),
        );
    }

    let base_y = PAD_TOP + plot_h;
    let _ = write!(
        svg,
        r#"<text x="{:.1}" y="{:.1}" class="axis-title">{}</text><text x="{:.1}" y="{:.1}" class="tick" text-anchor="end">{x_max:.2}</text>"#,
        PAD_LEFT + plot_w / 2.0,
        base_y + 36.0,
        escape(chart.x_label),
        PAD_LEFT + plot_w,
        base_y + 16.0,
    );
    let _ = write!(
        svg,
        r#"<text x="12" y="{:.1}" transform="rotate(-90 12 {:.1})" class="axis-title">{}</text>"#,
        PAD_TOP + plot_h / 2.0,
        PAD_TOP + plot_h / 2.0,
        escape(chart.y_label),
    );

    close_card(&mut svg);
    svg
}

fn open_card(id: &str, title: &str) -> String {
    format!(
        r#"<div class="card"><h3>{}</h3><svg id="{id}" viewBox="0 0 {CHART_W} {CHART_H}" role="img">"#,
        escape(title)
    )
}

fn close_card(svg: &mut String) {
    svg.push_str("</svg></div>\n");
}

/// Horizontal grid lines and tick labels from 0 to `max`.
fn y_axis(svg: &mut String, max: f64, plot_w: f64, plot_h: f64) {
    for tick in 0..=Y_TICKS {
        let frac = tick as f64 / Y_TICKS as f64;
        let y = PAD_TOP + plot_h - frac * plot_h;
        let _ = write!(
            svg,
            r#"<line x1="{PAD_LEFT}" x2="{:.1}" y1="{y:.1}" y2="{y:.1}" class="grid"/><text x="{:.1}" y="{:.1}" class="tick" text-anchor="end">{:.1}</text>"#,
            PAD_LEFT + plot_w,
            PAD_LEFT - 6.0,
            y + 4.0,
            frac * max,
        );
    }
}

/// Escape text for HTML element and attribute content.
pub(crate) fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Substitute `{{name}}` placeholders in one pass over `template`.
///
/// Substituted text is never rescanned, so placeholder-like text inside a
/// value (a model name, say) is emitted as-is. Unknown placeholders are kept.
fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find("}}") {
            Some(end) => {
                let name = &after[..end];
                match values.iter().find(|(key, _)| *key == name) {
                    Some((_, value)) => out.push_str(value),
                    None => {
                        out.push_str("{{");
                        out.push_str(name);
                        out.push_str("}}");
                    }
                }
                rest = &after[end + 2..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

const PAGE_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Model Performance Dashboard</title>
<style>
body { background: #0f172a; color: #e2e8f0; font-family: -apple-system, 'Segoe UI', Helvetica, Arial, sans-serif; margin: 0; }
.app { max-width: 1200px; margin: 0 auto; padding: 24px; }
h1 { font-size: 24px; }
.notice { background: #422006; color: #fbbf24; padding: 8px 12px; border-radius: 8px; }
.charts { display: grid; grid-template-columns: repeat(auto-fit, minmax(520px, 1fr)); gap: 16px; }
.card { background: #1e293b; border: 1px solid #334155; border-radius: 8px; padding: 16px; }
.card h3 { margin: 0 0 8px; font-size: 16px; }
svg { width: 100%; height: auto; }
.grid { stroke: #334155; }
.tick { fill: #cbd5e1; font-size: 11px; }
.axis-title { fill: #cbd5e1; font-size: 12px; text-anchor: middle; }
table { width: 100%; border-collapse: collapse; margin-top: 24px; }
th, td { padding: 8px 12px; border-bottom: 1px solid #334155; text-align: left; }
.rank-badge { display: inline-block; min-width: 36px; padding: 2px 8px; border-radius: 12px; background: #334155; text-align: center; }
.rank-1 { background: #fbbf24; color: #0f172a; }
.rank-2 { background: #cbd5e1; color: #0f172a; }
.rank-3 { background: #cd7f32; color: #0f172a; }
</style>
</head>
<body>
<div class="app">
<h1>Model Performance Comparison</h1>
{{notice}}
<div class="charts">
{{charts}}</div>
<table>
<thead><tr><th>Rank</th><th>Model</th><th>F1-Score (Macro)</th><th>F1-Score (Weighted)</th><th>Accuracy</th><th>Training Time</th></tr></thead>
<tbody id="modelTableBody">
{{rows}}</tbody>
</table>
</div>
</body>
</html>
"##;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::{DashboardModel, DashboardState, render};
    use crate::models::ModelRecord;

    fn rendered(state: &DashboardState) -> HtmlDashboard {
        let mut view = HtmlDashboard::new();
        render(&DashboardModel::build(state), &mut view);
        view
    }

    #[test]
    fn escape_special_characters() {
        assert_eq!(escape(r#"<a href="x">&'"#), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
    }

    #[test]
    fn draws_all_four_charts() {
        let view = rendered(&DashboardState::sample("offline"));
        for id in ["f1Chart", "accuracyChart", "timeChart", "scatterChart"] {
            assert!(view.chart(id).is_some(), "missing {id}");
        }
        assert_eq!(view.chart("f1Chart").unwrap().matches("<rect").count(), 10);
        assert_eq!(view.chart("scatterChart").unwrap().matches("<circle").count(), 10);
    }

    #[test]
    fn table_badges_and_order() {
        let view = rendered(&DashboardState::sample("offline"));
        let body = view.table_body();
        let rows: Vec<&str> = body.lines().collect();
        assert_eq!(rows.len(), 10);
        assert!(rows[0].contains(r#"<span class="rank-badge rank-1">1st</span>"#));
        assert!(rows[0].contains("Passive Aggressive"));
        assert!(rows[1].contains(r#"rank-2">2nd<"#));
        assert!(rows[2].contains(r#"rank-3">3rd<"#));
        assert!(rows[3].contains(r#"<span class="rank-badge">4</span>"#));
        assert!(rows[9].contains("Bernoulli Naive Bayes"));
        assert!(rows[9].contains("0.18s"));
    }

    #[test]
    fn model_names_are_escaped() {
        let state = DashboardState::live(vec![ModelRecord::new("<script>", 0.5, 0.5, 0.5, 1.0)]);
        let html = rendered(&state).to_html();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn rerender_replaces_table() {
        let mut view = HtmlDashboard::new();
        let model = DashboardModel::build(&DashboardState::sample("offline"));
        render(&model, &mut view);
        let first = view.to_html();
        render(&model, &mut view);
        assert_eq!(view.to_html(), first);
        assert_eq!(view.table_body().lines().count(), 10);
    }

    #[test]
    fn notice_only_for_sample_data() {
        let live = rendered(&DashboardState::live(vec![ModelRecord::new("A", 0.5, 0.5, 0.5, 1.0)]));
        assert!(!live.to_html().contains("class=\"notice\""));
        let sample = rendered(&DashboardState::sample("offline"));
        assert!(sample.to_html().contains("class=\"notice\""));
    }

    #[test]
    fn placeholder_text_in_names_is_not_expanded() {
        let state = DashboardState::live(vec![ModelRecord::new("X{{rows}}", 0.5, 0.5, 0.5, 1.0)]);
        let html = rendered(&state).to_html();
        assert_eq!(html.matches("<tr><td>").count(), 1);
        assert!(html.contains("X{{rows}}"));
    }

    #[test]
    fn fill_template_substitutes_once() {
        let out = fill_template(
            "a {{x}} b {{y}} c {{z}} {{",
            &[("x", "{{y}}"), ("y", "Y")],
        );
        assert_eq!(out, "a {{y}} b Y c {{z}} {{");
    }
}
