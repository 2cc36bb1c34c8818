use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use textclass::classify::SampleText;
use textclass::cli::{self, OutputFormat};

#[derive(Debug, Parser)]
#[command(name = "textclass")]
#[command(about = "Model comparison dashboard and text classifier client")]
struct App {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Show model comparison charts and the ranked metrics table
    Dashboard {
        /// Output format: table (default), json, csv
        #[arg(long, default_value = "table")]
        format: String,
        /// Also write a self-contained HTML dashboard to this path
        #[arg(long, value_name = "PATH")]
        html: Option<PathBuf>,
    },
    /// Classify a piece of text (reads stdin when no text is given)
    Classify {
        /// The text to classify
        text: Option<String>,
        /// Use a canned sample text instead
        #[arg(long, value_enum, conflicts_with = "text")]
        sample: Option<SampleText>,
        /// Output format: table (default), json
        #[arg(long, default_value = "table", value_parser = ["table", "json"])]
        format: String,
    },
    /// Show project statistics reported by the backend
    Stats {
        /// Output format: table (default), json, csv
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Check backend reachability, config files, and the event log
    Health,
    /// Serve the dashboard over HTTP
    Serve {
        /// Listen address (overrides `web.addr`)
        #[arg(long)]
        addr: Option<String>,
        /// Do not open a browser
        #[arg(long)]
        no_browser: bool,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Write the default config to ~/.textclass/config.toml
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Set a dotted key, e.g. `api.timeout_ms 5000`
    Set { key: String, value: String },
    /// Reset the global config to defaults
    Reset,
}

fn main() -> Result<()> {
    let app = App::parse();

    match app.command {
        Commands::Dashboard { format, html } => {
            let fmt = OutputFormat::from_str_opt(Some(&format));
            cli::run_dashboard(fmt, html.as_deref())
        }
        Commands::Classify {
            text,
            sample,
            format,
        } => {
            let fmt = OutputFormat::from_str_opt(Some(&format));
            cli::run_classify(text, sample, fmt)
        }
        Commands::Stats { format } => {
            let fmt = OutputFormat::from_str_opt(Some(&format));
            cli::run_stats(fmt)
        }
        Commands::Health => cli::run_health(),
        Commands::Serve { addr, no_browser } => cli::run_serve(addr, no_browser),
        Commands::Config { action } => match action {
            ConfigAction::Show => cli::run_config_show(),
            ConfigAction::Init { force } => cli::run_config_init(force),
            ConfigAction::Set { key, value } => cli::run_config_set(&key, &value),
            ConfigAction::Reset => cli::run_config_reset(),
        },
    }
}
