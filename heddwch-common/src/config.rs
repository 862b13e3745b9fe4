//! Configuration loading and root folder resolution
//!
//! Bootstrap settings are resolved in priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! A missing or malformed TOML file never stops startup: a warning is
//! logged and defaults apply.

use crate::state::PageId;
use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Where the claim datasets are read from
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSourceConfig {
    /// Base URL; dataset paths (`/data/...`) are appended to it
    Url(String),
    /// Local directory laid out like the web root (`<dir>/data/...`)
    Directory(PathBuf),
}

impl Default for DataSourceConfig {
    fn default() -> Self {
        DataSourceConfig::Url("http://127.0.0.1:8080".to_string())
    }
}

/// Whether the answer given on the last question is kept in `QuizOver`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinalAnswerPolicy {
    /// Keep it: `answers.len() == claims.len()`
    #[default]
    Include,
    /// Drop it: `answers.len() == claims.len() - 1`
    Exclude,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Bootstrap configuration loaded from TOML
///
/// Every key is optional.
#[derive(Debug, Clone, Deserialize)]
pub struct TomlConfig {
    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Root folder holding the database (optional)
    #[serde(default)]
    pub root_folder: Option<PathBuf>,

    /// Explicit database path, overrides `<root_folder>/heddwch.db`
    #[serde(default)]
    pub database_path: Option<PathBuf>,

    #[serde(default)]
    pub data_source: DataSourceConfig,

    /// Per-subscriber buffer on each MessageBus
    #[serde(default = "default_bus_capacity")]
    pub bus_capacity: usize,

    #[serde(default)]
    pub final_answer: FinalAnswerPolicy,

    /// Upper bound on debug log entries
    #[serde(default = "default_debug_log_max_entries")]
    pub debug_log_max_entries: usize,

    /// Navigation entries kept before the oldest is dropped
    #[serde(default = "default_history_max_entries")]
    pub history_max_entries: usize,

    /// Page active when the store starts
    #[serde(default = "default_initial_page")]
    pub initial_page: PageId,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            root_folder: None,
            database_path: None,
            data_source: DataSourceConfig::default(),
            bus_capacity: default_bus_capacity(),
            final_answer: FinalAnswerPolicy::default(),
            debug_log_max_entries: default_debug_log_max_entries(),
            history_max_entries: default_history_max_entries(),
            initial_page: default_initial_page(),
            logging: LoggingConfig::default(),
        }
    }
}

impl TomlConfig {
    /// Parse TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: TomlConfig =
            toml::from_str(content).map_err(|e| Error::Config(e.to_string()))?;
        if config.initial_page == PageId::Internal {
            return Err(Error::Config(
                "initial_page cannot be the internal channel".to_string(),
            ));
        }
        Ok(config)
    }

    /// Load from `path`, falling back to defaults on any problem
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            info!("No config file found, using defaults");
            return Self::default();
        };

        match std::fs::read_to_string(path) {
            Ok(content) => match Self::from_toml_str(&content) {
                Ok(config) => {
                    info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    warn!("Ignoring config file {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Could not read config file {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}

fn default_port() -> u16 {
    5790
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_bus_capacity() -> usize {
    256
}

fn default_debug_log_max_entries() -> usize {
    1_000_000
}

fn default_history_max_entries() -> usize {
    100
}

fn default_initial_page() -> PageId {
    PageId::FactOrFiction
}

/// Locate the config file
///
/// An explicit path wins; otherwise `~/.config/heddwch/config.toml`, then
/// `/etc/heddwch/config.toml` on Linux.
pub fn find_config_file(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    let user_config = dirs::config_dir().map(|d| d.join("heddwch").join("config.toml"));
    if let Some(path) = user_config {
        if path.exists() {
            return Some(path);
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/heddwch/config.toml");
        if system_config.exists() {
            return Some(system_config);
        }
    }

    None
}

/// Root folder resolution: CLI, then environment, then TOML, then default
pub fn resolve_root_folder(
    cli_arg: Option<&Path>,
    env_var_name: &str,
    toml_config: &TomlConfig,
) -> PathBuf {
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    if let Ok(path) = std::env::var(env_var_name) {
        if !path.is_empty() {
            return PathBuf::from(path);
        }
    }

    if let Some(path) = &toml_config.root_folder {
        return path.clone();
    }

    default_root_folder()
}

/// Database path: explicit TOML setting, else `<root>/heddwch.db`
pub fn database_path(root_folder: &Path, toml_config: &TomlConfig) -> PathBuf {
    toml_config
        .database_path
        .clone()
        .unwrap_or_else(|| root_folder.join("heddwch.db"))
}

/// Get OS-dependent default root folder path
pub fn default_root_folder() -> PathBuf {
    if cfg!(target_os = "linux") {
        // ~/.local/share/heddwch (or /var/lib/heddwch for system-wide)
        dirs::data_local_dir()
            .map(|d| d.join("heddwch"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/heddwch"))
    } else if cfg!(target_os = "macos") {
        dirs::data_dir()
            .map(|d| d.join("heddwch"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/heddwch"))
    } else if cfg!(target_os = "windows") {
        dirs::data_local_dir()
            .map(|d| d.join("heddwch"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\heddwch"))
    } else {
        PathBuf::from("./heddwch_data")
    }
}
