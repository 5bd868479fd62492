//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::remote::Resource;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub endpoints: EndpointsConfig,

    #[serde(default)]
    pub http: HttpConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where each resource lives
///
/// Paths are joined onto `base_url`; a path that is already an absolute
/// URL is used unchanged.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct EndpointsConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_daily_report")]
    pub daily_report: String,

    #[serde(default = "default_daily_summary")]
    pub daily_summary: String,

    #[serde(default = "default_platform_status")]
    pub platform_status: String,

    #[serde(default = "default_game_scores")]
    pub game_scores: String,

    #[serde(default = "default_missed_words")]
    pub missed_words: String,
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_daily_report() -> String {
    "/analytics/daily-report".to_string()
}

fn default_daily_summary() -> String {
    "/analytics/daily-report/summary".to_string()
}

fn default_platform_status() -> String {
    "/status".to_string()
}

fn default_game_scores() -> String {
    "/analytics/game-scores".to_string()
}

fn default_missed_words() -> String {
    "/analytics/missed-words".to_string()
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            daily_report: default_daily_report(),
            daily_summary: default_daily_summary(),
            platform_status: default_platform_status(),
            game_scores: default_game_scores(),
            missed_words: default_missed_words(),
        }
    }
}

impl EndpointsConfig {
    /// Configured path of a resource
    pub fn path_for(&self, resource: Resource) -> &str {
        match resource {
            Resource::DailyReport => &self.daily_report,
            Resource::DailySummary => &self.daily_summary,
            Resource::PlatformStatus => &self.platform_status,
            Resource::GameScores => &self.game_scores,
            Resource::MissedWords => &self.missed_words,
        }
    }

    /// Absolute URL of a resource
    pub fn url_for(&self, resource: Resource) -> String {
        let path = self.path_for(resource);
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }

        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

/// HTTP transport configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_request_timeout() -> u64 {
    10_000 // 10 seconds
}

fn default_user_agent() -> String {
    format!("pulseboard/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            request_timeout_ms: default_request_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|error| ConfigError::Parse {
            path: path.to_path_buf(),
            error,
        })
    }

    fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("pulseboard").join("config.toml")),
            Some(PathBuf::from("./pulseboard.toml")),
        ];

        for path in config_paths.iter().flatten() {
            if path.exists() {
                match Self::load_with_env(path) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("PULSEBOARD_BASE_URL") {
            self.endpoints.base_url = url;
        }

        if let Ok(timeout) = std::env::var("PULSEBOARD_TIMEOUT_MS") {
            if let Ok(ms) = timeout.parse() {
                self.http.request_timeout_ms = ms;
            }
        }

        if let Ok(level) = std::env::var("PULSEBOARD_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("PULSEBOARD_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Pulseboard Configuration
#
# Environment variables override these settings:
# - PULSEBOARD_BASE_URL
# - PULSEBOARD_TIMEOUT_MS
# - PULSEBOARD_LOG_LEVEL
# - PULSEBOARD_LOG_FORMAT

[endpoints]
# Base URL of the analytics backend
base_url = "http://localhost:8080"

# Resource paths (absolute URLs are used as is)
daily_report = "/analytics/daily-report"
daily_summary = "/analytics/daily-report/summary"
platform_status = "/status"
game_scores = "/analytics/game-scores"
missed_words = "/analytics/missed-words"

[http]
# Request timeout in milliseconds
request_timeout_ms = 10000

[logging]
# Log level: trace, debug, info, warn, error
level = "warn"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
