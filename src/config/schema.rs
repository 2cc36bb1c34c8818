/// Configuration schema and defaults for textclass.
///
/// Defines the TOML-serializable configuration with three sections:
/// `[api]`, `[web]` and `[logging]`. Every field has a built-in default, so a
/// config file only needs the keys the user wants to change.
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level textclass configuration.
///
/// Maps directly to `~/.textclass/config.toml` and `.textclass.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextclassConfig {
    pub api: ApiConfig,
    pub web: WebConfig,
    pub logging: LoggingConfig,
}

// ---------------------------------------------------------------------------
// [api]
// ---------------------------------------------------------------------------

/// Where the classification backend lives and how long to wait for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Backend base URL, e.g. `http://127.0.0.1:5000`.
    pub base_url: String,
    /// Per-request timeout in milliseconds. A request that exceeds it is a
    /// failed request, never a hung one.
    pub timeout_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            timeout_ms: 10_000,
        }
    }
}

// ---------------------------------------------------------------------------
// [web]
// ---------------------------------------------------------------------------

/// Local dashboard server settings (`textclass serve`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    /// Listen address.
    pub addr: String,
    /// Open the dashboard in the default browser on start.
    pub open_browser: bool,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:9747".to_string(),
            open_browser: true,
        }
    }
}

// ---------------------------------------------------------------------------
// [logging]
// ---------------------------------------------------------------------------

/// Event log settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Whether request events are appended to the JSONL log.
    pub enabled: bool,
    /// Path to the event log. `~` is expanded to the home directory.
    pub path: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "~/.textclass/events.jsonl".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Annotated default TOML
// ---------------------------------------------------------------------------

impl TextclassConfig {
    /// The commented default config written by `textclass config init`.
    pub fn default_toml() -> &'static str {
        DEFAULT_TOML
    }
}

const DEFAULT_TOML: &str = r#"# textclass configuration
#
# Precedence (highest last): built-in defaults, ~/.textclass/config.toml,
# ./.textclass.toml, TEXTCLASS_* environment variables.

[api]
# Base URL of the classification backend.
base_url = "http://127.0.0.1:5000"
# Per-request timeout in milliseconds.
timeout_ms = 10000

[web]
# Listen address for `textclass serve`.
addr = "127.0.0.1:9747"
open_browser = true

[logging]
enabled = true
path = "~/.textclass/events.jsonl"
"#;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_toml_parses_to_defaults() {
        let parsed: TextclassConfig = toml::from_str(DEFAULT_TOML).unwrap();
        assert_eq!(parsed, TextclassConfig::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let parsed: TextclassConfig = toml::from_str(
            r#"
[api]
timeout_ms = 2500
"#,
        )
        .unwrap();
        assert_eq!(parsed.api.timeout_ms, 2500);
        assert_eq!(parsed.api.base_url, "http://127.0.0.1:5000");
        assert!(parsed.logging.enabled);
        assert_eq!(parsed.web.addr, "127.0.0.1:9747");
    }

    #[test]
    fn empty_file_is_default() {
        let parsed: TextclassConfig = toml::from_str("").unwrap();
        assert_eq!(parsed, TextclassConfig::default());
    }
}
