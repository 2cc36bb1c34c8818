use std::fs::{self, OpenOptions, create_dir_all};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::config::{self, TextclassConfig};

// ---------------------------------------------------------------------------
// Event entry (JSONL)
// ---------------------------------------------------------------------------

/// What a logged request was for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// `GET /api/models` for the dashboard.
    FetchModels,
    /// The dashboard fell back to the built-in sample data.
    SampleFallback,
    /// `POST /predict` from the classification form.
    Predict,
    /// `GET /api/stats`.
    FetchStats,
    /// `GET /health`.
    Health,
}

/// A single line in `~/.textclass/events.jsonl`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub timestamp: String,
    pub kind: EventKind,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub latency_ms: Option<u64>,
    /// Error text, fallback reason, or the predicted category of a
    /// successful prediction.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub detail: Option<String>,
}

impl Event {
    pub fn new(kind: EventKind, success: bool) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            kind,
            success,
            latency_ms: None,
            detail: None,
        }
    }

    pub fn with_latency(mut self, latency_ms: u64) -> Self {
        self.latency_ms = Some(latency_ms);
        self
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

// ---------------------------------------------------------------------------
// Logger
// ---------------------------------------------------------------------------

/// Best-effort append-only event log.
///
/// Write failures are swallowed: logging must never turn a successful
/// request into a failed one.
#[derive(Debug, Clone, Default)]
pub struct EventLogger {
    path: Option<PathBuf>,
}

impl EventLogger {
    /// Build from the `[logging]` section. Disabled logging yields a no-op logger.
    pub fn from_config(config: &TextclassConfig) -> Self {
        if !config.logging.enabled {
            return Self::disabled();
        }
        Self {
            path: config::expand_home(&config.logging.path),
        }
    }

    pub fn to_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    pub fn disabled() -> Self {
        Self { path: None }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn record(&self, event: &Event) {
        if let Some(path) = &self.path {
            let _ = append_event(path, event);
        }
    }

    /// Read every well-formed entry; malformed lines are skipped.
    pub fn read_all(&self) -> Vec<Event> {
        let Some(path) = &self.path else {
            return Vec::new();
        };
        let Ok(file) = fs::File::open(path) else {
            return Vec::new();
        };

        BufReader::new(file)
            .lines()
            .map_while(Result::ok)
            .filter_map(|line| serde_json::from_str::<Event>(&line).ok())
            .collect()
    }
}

fn append_event(path: &Path, event: &Event) -> Result<()> {
    if let Some(parent) = path.parent() {
        create_dir_all(parent)?;
    }

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    let json = serde_json::to_string(event)?;
    writeln!(file, "{json}")?;

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
