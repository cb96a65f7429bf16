//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.hal/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{LevelFilter, debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::editor::DEFAULT_EDITOR;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct HalConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub editor: EditorConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub system_prompt: Option<String>,
    pub thread_name: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct EditorConfig {
    pub command: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct LogConfig {
    pub file: Option<String>,
    pub level: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_LOG_FILE: &str = "hal.log";
pub const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Debug;
pub const DEFAULT_THREAD_NAME: &str = "Get to know HAL";
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are HAL, a powerful code and text editor \
    controlled by natural language. Answer as concisely as possible.";

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub editor: String,
    pub log_file: PathBuf,
    pub log_level: LevelFilter,
    pub system_prompt: String,
    pub thread_name: String,
}

/// Values given on the command line. `None` means "not specified".
#[derive(Debug, Default)]
pub struct CliOverrides<'a> {
    pub editor: Option<&'a str>,
    pub log_file: Option<&'a Path>,
    pub log_level: Option<&'a str>,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
        }
    }
}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.hal/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".hal").join("config.toml"))
}

/// Load config from `~/.hal/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `HalConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<HalConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(HalConfig::default());
        }
    };
    load_config_from(&path)
}

/// Same as [`load_config`] for an explicit path.
pub fn load_config_from(path: &Path) -> Result<HalConfig, ConfigError> {
    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(path);
        return Ok(HalConfig::default());
    }

    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: HalConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# HAL Configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# thread_name = "Get to know HAL"
# system_prompt = "You are HAL, a powerful code and text editor controlled by natural language."

# [editor]
# command = "vim"                    # Or set EDITOR env var

# [log]
# file = "hal.log"
# level = "debug"                    # "off", "error", "warn", "info", "debug", "trace"
"#;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &HalConfig, cli: &CliOverrides<'_>) -> ResolvedConfig {
    resolve_with_env(config, cli, |key| std::env::var(key).ok())
}

/// [`resolve`] with an injectable environment lookup.
pub fn resolve_with_env(
    config: &HalConfig,
    cli: &CliOverrides<'_>,
    env: impl Fn(&str) -> Option<String>,
) -> ResolvedConfig {
    // Editor: CLI → env → config → default
    let editor = cli
        .editor
        .map(str::to_string)
        .or_else(|| env("EDITOR").filter(|e| !e.trim().is_empty()))
        .or_else(|| config.editor.command.clone())
        .unwrap_or_else(|| DEFAULT_EDITOR.to_string());

    // Log file: CLI → config → default
    let log_file = cli
        .log_file
        .map(Path::to_path_buf)
        .or_else(|| config.log.file.as_ref().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE));

    // Log level: CLI → env → config → default. Unparseable values fall through.
    let log_level = cli
        .log_level
        .and_then(parse_level)
        .or_else(|| env("HAL_LOG_LEVEL").as_deref().and_then(parse_level))
        .or_else(|| config.log.level.as_deref().and_then(parse_level))
        .unwrap_or(DEFAULT_LOG_LEVEL);

    ResolvedConfig {
        editor,
        log_file,
        log_level,
        system_prompt: config
            .general
            .system_prompt
            .clone()
            .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string()),
        thread_name: config
            .general
            .thread_name
            .clone()
            .unwrap_or_else(|| DEFAULT_THREAD_NAME.to_string()),
    }
}

fn parse_level(s: &str) -> Option<LevelFilter> {
    match s.parse() {
        Ok(level) => Some(level),
        Err(_) => {
            warn!("Ignoring unknown log level {:?}", s);
            None
        }
    }
}
