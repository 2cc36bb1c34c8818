//! CLI command implementations.
//!
//! Provides subcommand handlers for:
//! - `textclass dashboard` — model comparison charts and ranked table
//! - `textclass classify "text"` — classify text via the backend
//! - `textclass stats` — project statistics from the backend
//! - `textclass health` — backend reachability, config, event log
//! - `textclass config show|init|set|reset` — configuration management

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;

use crate::analytics::EventLogger;
use crate::api::{ApiClient, ProjectStats};
use crate::classify::{self, FormController, FormView, ResultView, SampleText, SubmitOutcome};
use crate::config::{self, TextclassConfig};
use crate::dashboard::{
    DashboardModel, DashboardState, DataSource, HtmlDashboard, TerminalDashboard, render,
};

/// Output format for report commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

impl OutputFormat {
    pub fn from_str_opt(s: Option<&str>) -> Self {
        match s {
            Some("json") => Self::Json,
            Some("csv") => Self::Csv,
            _ => Self::Table,
        }
    }
}

// ---------------------------------------------------------------------------
// textclass dashboard
// ---------------------------------------------------------------------------

/// Fetch the comparison data once and render it.
///
/// With `html_out`, the HTML dashboard is also written to that path.
pub fn run_dashboard(format: OutputFormat, html_out: Option<&Path>) -> Result<()> {
    let cfg = config::load();
    let client = ApiClient::from_config(&cfg);
    let state = DashboardState::load(&client, &EventLogger::from_config(&cfg));
    let model = DashboardModel::build(&state);

    if let Some(path) = html_out {
        let mut view = HtmlDashboard::new();
        render(&model, &mut view);
        std::fs::write(path, view.to_html())
            .with_context(|| format!("failed to write {}", path.display()))?;
        eprintln!("{} Dashboard written to {}", "✓".green().bold(), path.display());
    }

    match format {
        OutputFormat::Json => print_dashboard_json(&model)?,
        OutputFormat::Csv => print!("{}", dashboard_csv(&model)),
        OutputFormat::Table => {
            let mut view = TerminalDashboard::new();
            render(&model, &mut view);
            print!("{}", view.output());
        }
    }

    Ok(())
}

fn print_dashboard_json(model: &DashboardModel) -> Result<()> {
    let (source, reason) = match &model.source {
        DataSource::Live => ("live", None),
        DataSource::Sample { reason } => ("sample", Some(reason.as_str())),
    };
    let value = serde_json::json!({
        "source": source,
        "fallback_reason": reason,
        "models": model.rows.iter().zip(&model.ranked).map(|(row, record)| serde_json::json!({
            "rank": row.rank + 1,
            "badge": row.badge,
            "model": record.name,
            "f1_macro": record.f1_macro,
            "f1_weighted": record.f1_weighted,
            "accuracy": record.accuracy,
            "training_time_secs": record.training_time_secs,
        })).collect::<Vec<_>>(),
    });

    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

fn dashboard_csv(model: &DashboardModel) -> String {
    let mut out = String::from("rank,model,f1_macro,f1_weighted,accuracy,training_time_secs\n");
    for row in &model.rows {
        out.push_str(&format!(
            "{},{},{},{},{},{}\n",
            row.rank + 1,
            csv_field(&row.name),
            row.f1_macro,
            row.f1_weighted,
            row.accuracy,
            row.training_time.trim_end_matches('s'),
        ));
    }
    out
}

/// Quote a CSV field when it contains a delimiter, quote, or newline.
fn csv_field(s: &str) -> String {
    if s.contains([',', '"', '\n']) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

// ---------------------------------------------------------------------------
// textclass classify
// ---------------------------------------------------------------------------

/// Collects alerts instead of printing them; used for `--format json`.
#[derive(Debug, Default)]
struct QuietForm {
    alerts: Vec<String>,
}

impl FormView for QuietForm {
    fn set_submit_enabled(&mut self, _enabled: bool) {}
    fn set_loading(&mut self, _loading: bool) {}
    fn hide_result(&mut self) {}
    fn show_result(&mut self, _result: &ResultView) {}
    fn alert(&mut self, message: &str) {
        self.alerts.push(message.to_string());
    }
}

/// Classify text from the argument, a canned sample, or stdin.
///
/// Exits with status 1 when the request fails or the text is blank; the
/// message has already been shown to the user. CSV output is not supported.
pub fn run_classify(text: Option<String>, sample: Option<SampleText>, format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Csv {
        anyhow::bail!("classify supports table and json output, not csv");
    }

    let text = match (text, sample) {
        (Some(text), _) => text,
        (None, Some(sample)) => sample.text().to_string(),
        (None, None) => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read text from stdin")?;
            buf
        }
    };

    let client = ApiClient::from_config(&config::load());

    let outcome = match format {
        OutputFormat::Json => {
            let mut form = FormController::new(client, QuietForm::default());
            let outcome = form.submit(&text);
            let alerts = form.into_view().alerts;
            match &outcome {
                SubmitOutcome::Success(result) => {
                    println!("{}", serde_json::to_string_pretty(result)?);
                }
                _ => {
                    let value = serde_json::json!({ "error": alerts.last() });
                    println!("{}", serde_json::to_string_pretty(&value)?);
                }
            }
            outcome
        }
        OutputFormat::Table | OutputFormat::Csv => {
            eprintln!(
                "{} {} characters",
                "Input:".dimmed(),
                classify::char_count(text.trim())
            );
            let mut form = FormController::new(client, classify::TerminalForm::new());
            form.submit(&text)
        }
    };

    if !matches!(outcome, SubmitOutcome::Success(_)) {
        std::process::exit(1);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// textclass stats
// ---------------------------------------------------------------------------

/// Show project statistics from `GET /api/stats`.
pub fn run_stats(format: OutputFormat) -> Result<()> {
    let client = ApiClient::from_config(&config::load());
    let stats = client
        .fetch_stats()
        .with_context(|| format!("failed to fetch stats from {}", client.base_url()))?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&stats)?),
        OutputFormat::Csv => {
            println!("key,value");
            for (key, value) in stats_pairs(&stats) {
                println!("{key},{}", csv_field(&value));
            }
        }
        OutputFormat::Table => {
            println!("{}", "Project Statistics".bold().cyan());
            println!("{}", "=".repeat(40));
            for (key, value) in stats_pairs(&stats) {
                println!("  {:<16} {}", format!("{key}:").bold(), value);
            }
        }
    }

    Ok(())
}

fn stats_pairs(stats: &ProjectStats) -> Vec<(&'static str, String)> {
    vec![
        ("dataset", stats.dataset.clone()),
        ("total_samples", stats.total_samples.clone()),
        ("categories", stats.categories.to_string()),
        ("features", stats.features.clone()),
        ("best_model", stats.best_model.clone()),
        ("preprocessing", stats.preprocessing.join(" → ")),
        ("models_trained", stats.models_trained.to_string()),
    ]
}

// ---------------------------------------------------------------------------
// textclass health
// ---------------------------------------------------------------------------

/// Check backend reachability, config files, and the event log.
pub fn run_health() -> Result<()> {
    println!("{}", "textclass Health Check".bold().cyan());
    println!("{}", "=".repeat(40));

    let global_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let project_exists = config::project_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    print_health_item(
        "Global config",
        global_exists,
        if global_exists {
            "~/.textclass/config.toml found"
        } else {
            "not found (run `textclass config init` to create)"
        },
    );
    print_health_item(
        "Project config",
        project_exists,
        if project_exists {
            ".textclass.toml found"
        } else {
            "none (optional)"
        },
    );

    let cfg = config::load();
    let client = ApiClient::from_config(&cfg);
    match client.health() {
        Ok(health) => {
            let model = health.model.unwrap_or_else(|| "unknown model".to_string());
            print_health_item(
                "Backend",
                health.status == "healthy",
                &format!("{} at {} ({model})", health.status, client.base_url()),
            );
        }
        Err(e) => print_health_item("Backend", false, &format!("{} ({e})", client.base_url())),
    }

    let logger = EventLogger::from_config(&cfg);
    match logger.path() {
        Some(path) if path.exists() => print_health_item(
            "Event log",
            true,
            &format!("{} entries", logger.read_all().len()),
        ),
        Some(_) => print_health_item("Event log", true, "no events yet"),
        None => print_health_item("Event log", false, "disabled"),
    }

    Ok(())
}

fn print_health_item(name: &str, ok: bool, detail: &str) {
    let status = if ok {
        "✓".green().bold()
    } else {
        "✗".red().bold()
    };
    println!("  {} {:<16} {}", status, name, detail.dimmed());
}

// ---------------------------------------------------------------------------
// textclass config show | init | set | reset
// ---------------------------------------------------------------------------

pub fn run_config_show() -> Result<()> {
    let toml_str = config::show_effective_config()?;
    println!("{}", "Effective textclass Configuration".bold().cyan());
    println!("{}", "=".repeat(50));
    println!();
    println!("{toml_str}");

    println!("{}", "Sources (highest priority last):".dimmed());
    println!("  {} built-in defaults", "·".dimmed());
    print_source(config::global_config_file().as_deref(), "~/.textclass/config.toml");
    print_source(config::project_config_file().as_deref(), ".textclass.toml");
    println!(
        "  {} {}",
        "·".dimmed(),
        "TEXTCLASS_* environment variables".dimmed()
    );

    Ok(())
}

fn print_source(path: Option<&Path>, label: &str) {
    if path.is_some_and(Path::exists) {
        println!("  {} {}", "✓".green(), label.dimmed());
    } else {
        println!("  {} {}", "·".dimmed(), format!("{label} (not found)").dimmed());
    }
}

pub fn run_config_init(force: bool) -> Result<()> {
    let path = config::init_config(force)?;
    println!("{} Config written to {}", "✓".green().bold(), path.display());
    Ok(())
}

pub fn run_config_set(key: &str, value: &str) -> Result<()> {
    config::set_config_value(key, value)?;
    println!("{} Set {} = {}", "✓".green().bold(), key.bold(), value);
    Ok(())
}

pub fn run_config_reset() -> Result<()> {
    let path = config::reset_config()?;
    println!(
        "{} Config reset to defaults at {}",
        "✓".green().bold(),
        path.display()
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// textclass serve
// ---------------------------------------------------------------------------

/// Start the local dashboard server, optionally overriding the listen address.
pub fn run_serve(addr: Option<String>, no_browser: bool) -> Result<()> {
    let mut cfg: TextclassConfig = config::load();
    if let Some(addr) = addr {
        cfg.web.addr = addr;
    }
    if no_browser {
        cfg.web.open_browser = false;
    }
    crate::web::serve(&cfg)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ModelRecord;

    #[test]
    fn test_output_format_parsing() {
        assert_eq!(OutputFormat::from_str_opt(None), OutputFormat::Table);
        assert_eq!(OutputFormat::from_str_opt(Some("json")), OutputFormat::Json);
        assert_eq!(OutputFormat::from_str_opt(Some("csv")), OutputFormat::Csv);
        assert_eq!(
            OutputFormat::from_str_opt(Some("unknown")),
            OutputFormat::Table
        );
    }

    #[test]
    fn csv_quotes_awkward_fields() {
        assert_eq!(csv_field("Linear SVM"), "Linear SVM");
        assert_eq!(csv_field("a,b"), "\"a,b\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn dashboard_csv_is_ranked() {
        let state = DashboardState::live(vec![
            ModelRecord::new("Low", 0.1, 0.2, 0.3, 4.5),
            ModelRecord::new("High, Inc", 0.9, 0.8, 0.7, 1.0),
        ]);
        let csv = dashboard_csv(&DashboardModel::build(&state));
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "rank,model,f1_macro,f1_weighted,accuracy,training_time_secs");
        assert_eq!(lines[1], "1,\"High, Inc\",0.9000,0.8000,0.7000,1.00");
        assert_eq!(lines[2], "2,Low,0.1000,0.2000,0.3000,4.50");
    }

    #[test]
    fn quiet_form_collects_alerts() {
        let mut form = QuietForm::default();
        form.alert("Error: x");
        assert_eq!(form.alerts, vec!["Error: x"]);
    }

    #[test]
    fn classify_rejects_csv_before_any_request() {
        let err = run_classify(Some("Paris".to_string()), None, OutputFormat::Csv).unwrap_err();
        assert!(err.to_string().contains("not csv"));
    }
}
