use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable overriding `api.token`.
pub const TOKEN_ENV: &str = "FUNDRAISER_API_TOKEN";
/// Environment variable overriding `api.base_url`.
pub const API_URL_ENV: &str = "FUNDRAISER_API_URL";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub search: SearchConfig,
    pub wizard: WizardConfig,
    pub tui: TuiConfig,
    pub data: DataConfig,
}

/// Remote campaign API.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL every endpoint path is appended to.
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Bearer token from the identity provider. Absent means signed out.
    pub token: Option<String>,
    /// User the token belongs to.
    pub user_id: Option<String>,
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("user_id", &self.user_id)
            .finish()
    }
}

/// Incremental search tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Keystroke inactivity before a query is sent.
    pub debounce_ms: u64,
    /// Queries shorter than this are never sent.
    pub min_query_len: usize,
    /// How many matches are kept for display.
    pub max_results: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WizardConfig {
    /// Refuse to leave a step while its required fields are empty.
    pub strict_steps: bool,
}

/// TUI-specific configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TuiConfig {
    /// Tick interval in milliseconds for the event loop.
    pub tick_rate_ms: u64,
}

/// Data directory configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Override the default data directory (logs live here).
    pub data_dir: Option<PathBuf>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000/api/".to_string(),
            timeout_secs: 30,
            token: None,
            user_id: None,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 300,
            min_query_len: 2,
            max_results: 5,
        }
    }
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self { tick_rate_ms: 50 }
    }
}

impl AppConfig {
    /// Load configuration from `~/.config/fundraiser/config.toml` and apply
    /// environment overrides. Falls back to defaults if the file is missing
    /// or unparseable.
    pub fn load() -> Self {
        let config_path = Self::config_path();
        let mut config = match Self::load_from(&config_path) {
            Ok(config) => {
                log::info!("Loaded config from {}", config_path.display());
                config
            }
            Err(ConfigError::Io { .. }) => {
                log::debug!("No config file at {}, using defaults", config_path.display());
                Self::default()
            }
            Err(e) => {
                log::warn!("{e}; using defaults");
                Self::default()
            }
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        config
    }

    /// Parse a specific config file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply overrides from an environment-like lookup.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(token) = lookup(TOKEN_ENV).filter(|t| !t.is_empty()) {
            log::debug!("Using API token from {TOKEN_ENV}");
            self.api.token = Some(token);
        }
        if let Some(url) = lookup(API_URL_ENV).filter(|u| !u.is_empty()) {
            log::debug!("Using API URL from {API_URL_ENV}: {url}");
            self.api.base_url = url;
        }
    }

    /// Resolved data directory (override or XDG default).
    pub fn data_dir(&self) -> PathBuf {
        self.data.data_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .map(|d| d.join("fundraiser"))
                .unwrap_or_else(|| PathBuf::from("data"))
        })
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join("fundraiser").join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }
}
