/// Configuration system for textclass.
///
/// Provides a layered configuration hierarchy:
///
/// 1. **Built-in defaults** — [`schema::TextclassConfig::default()`]
/// 2. **User global config** — `~/.textclass/config.toml`
/// 3. **Project local config** — `.textclass.toml` in the current directory
/// 4. **Environment variables** — `TEXTCLASS_*` overrides (highest precedence)
///
/// Later layers override earlier ones key by key: a file that only sets
/// `api.timeout_ms` leaves every other value from the previous layer intact.
pub mod schema;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub use schema::TextclassConfig;

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Load the fully resolved configuration.
///
/// Malformed files are reported on stderr and skipped; loading never fails.
pub fn load() -> TextclassConfig {
    let paths: Vec<PathBuf> = [global_config_path(), project_config_path()]
        .into_iter()
        .flatten()
        .collect();

    let mut config = load_layers(&paths);
    apply_env_overrides(&mut config);
    config
}

/// Merge the given files over the defaults, in order.
///
/// A layer that fails to parse, or whose values have the wrong type, is
/// skipped on its own; earlier layers stay in effect.
fn load_layers(paths: &[PathBuf]) -> TextclassConfig {
    let Ok(mut merged) = toml::Value::try_from(TextclassConfig::default()) else {
        return TextclassConfig::default();
    };

    for path in paths {
        let Some(layer) = load_toml_file(path) else {
            continue;
        };

        let mut candidate = merged.clone();
        merge_values(&mut candidate, layer);
        match candidate.clone().try_into::<TextclassConfig>() {
            Ok(_) => merged = candidate,
            Err(e) => {
                eprintln!("[textclass] ignoring invalid config {}: {e}", path.display());
            }
        }
    }

    merged.try_into().unwrap_or_default()
}

/// Read a TOML file as a raw value tree (if it exists and parses).
fn load_toml_file(path: &Path) -> Option<toml::Value> {
    let content = fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(value) => Some(value),
        Err(e) => {
            eprintln!("[textclass] ignoring malformed config {}: {e}", path.display());
            None
        }
    }
}

/// Overlay `layer` onto `base`: tables merge recursively, everything else
/// replaces.
fn merge_values(base: &mut toml::Value, layer: toml::Value) {
    match (base, layer) {
        (toml::Value::Table(base_table), toml::Value::Table(layer_table)) => {
            for (key, value) in layer_table {
                match base_table.get_mut(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        base_table.insert(key, value);
                    }
                }
            }
        }
        (base, layer) => *base = layer,
    }
}

// ---------------------------------------------------------------------------
// File paths
// ---------------------------------------------------------------------------

/// `~/.textclass/config.toml`
fn global_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".textclass").join("config.toml"))
}

/// `.textclass.toml` in the current directory.
fn project_config_path() -> Option<PathBuf> {
    std::env::current_dir()
        .ok()
        .map(|cwd| cwd.join(".textclass.toml"))
}

pub fn global_config_file() -> Option<PathBuf> {
    global_config_path()
}

pub fn project_config_file() -> Option<PathBuf> {
    project_config_path()
}

/// Expand a leading `~` to the home directory.
pub fn expand_home(path: &str) -> Option<PathBuf> {
    match path.strip_prefix("~/") {
        Some(rest) => dirs::home_dir().map(|home| home.join(rest)),
        None if path == "~" => dirs::home_dir(),
        None => Some(PathBuf::from(path)),
    }
}

// ---------------------------------------------------------------------------
// Environment variable overrides
// ---------------------------------------------------------------------------

/// Supported variables:
/// - `TEXTCLASS_API_URL` — backend base URL
/// - `TEXTCLASS_TIMEOUT_MS` — request timeout
/// - `TEXTCLASS_LOG` — event log on/off (`1`/`true`/`yes`/`on`)
/// - `TEXTCLASS_WEB_ADDR` — listen address for `serve`
fn apply_env_overrides(config: &mut TextclassConfig) {
    if let Ok(val) = std::env::var("TEXTCLASS_API_URL")
        && !val.is_empty()
    {
        config.api.base_url = val;
    }
    if let Ok(val) = std::env::var("TEXTCLASS_TIMEOUT_MS")
        && let Ok(ms) = val.parse::<u64>()
    {
        config.api.timeout_ms = ms;
    }
    if let Ok(val) = std::env::var("TEXTCLASS_LOG") {
        config.logging.enabled = is_truthy(&val);
    }
    if let Ok(val) = std::env::var("TEXTCLASS_WEB_ADDR")
        && !val.is_empty()
    {
        config.web.addr = val;
    }
}

fn is_truthy(val: &str) -> bool {
    matches!(
        val.to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

// ---------------------------------------------------------------------------
// Config init / set / reset
// ---------------------------------------------------------------------------

/// Write the annotated default config to `~/.textclass/config.toml`.
///
/// Refuses to overwrite an existing file unless `force` is set.
pub fn init_config(force: bool) -> Result<PathBuf> {
    let path = global_config_path().context("could not determine home directory")?;

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create ~/.textclass/ directory")?;
    }

    fs::write(&path, TextclassConfig::default_toml()).context("failed to write config file")?;

    Ok(path)
}

/// Set one dotted key (e.g. `api.timeout_ms`) in the global config file.
///
/// Starts from the existing file, or from the defaults when there is none.
pub fn set_config_value(key: &str, value: &str) -> Result<PathBuf> {
    let path = global_config_path().context("could not determine home directory")?;

    let mut root: toml::Value = if path.exists() {
        let content = fs::read_to_string(&path).context("failed to read config file")?;
        toml::from_str(&content).context("failed to parse config file")?
    } else {
        toml::Value::try_from(TextclassConfig::default())
            .context("failed to serialize default config")?
    };

    set_toml_value(&mut root, key, value)?;

    // Reject edits that no longer deserialize into a valid config.
    let _: TextclassConfig = root
        .clone()
        .try_into()
        .with_context(|| format!("invalid value for '{key}': {value}"))?;

    let output = toml::to_string_pretty(&root).context("failed to serialize updated config")?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create config directory")?;
    }
    fs::write(&path, output).context("failed to write config file")?;

    Ok(path)
}

/// Set a value in a TOML tree by dotted path, keeping the existing type.
fn set_toml_value(root: &mut toml::Value, key: &str, raw_value: &str) -> Result<()> {
    let parts: Vec<&str> = key.split('.').collect();
    let Some((leaf, sections)) = parts.split_last() else {
        anyhow::bail!("empty config key");
    };
    if leaf.is_empty() {
        anyhow::bail!("empty config key");
    }

    let mut current = root;
    for &part in sections {
        current = current
            .get_mut(part)
            .with_context(|| format!("config key not found: section '{part}' in '{key}'"))?;
    }

    let table = current
        .as_table_mut()
        .with_context(|| format!("expected a table above '{key}'"))?;

    let new_value = match table.get(*leaf) {
        Some(toml::Value::Boolean(_)) => toml::Value::Boolean(is_truthy(raw_value)),
        Some(toml::Value::Integer(_)) => {
            let n: i64 = raw_value
                .parse()
                .with_context(|| format!("expected integer for '{key}', got '{raw_value}'"))?;
            toml::Value::Integer(n)
        }
        Some(toml::Value::Float(_)) => {
            let f: f64 = raw_value
                .parse()
                .with_context(|| format!("expected float for '{key}', got '{raw_value}'"))?;
            toml::Value::Float(f)
        }
        Some(_) => toml::Value::String(raw_value.to_string()),
        None => anyhow::bail!("unknown config key: '{key}'"),
    };

    table.insert(leaf.to_string(), new_value);
    Ok(())
}

/// Overwrite the global config with defaults.
pub fn reset_config() -> Result<PathBuf> {
    init_config(true)
}

/// The effective (fully merged) config as TOML.
pub fn show_effective_config() -> Result<String> {
    let config = load();
    toml::to_string_pretty(&config).context("failed to serialize effective config")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
