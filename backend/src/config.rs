//! Server configuration file and environment variable handling.
//!
//! Values are layered: built-in defaults, then an optional `coverage.toml`,
//! then environment variables.
//!
//! ```toml
//! [server]
//! host = "127.0.0.1"
//! port = 9000
//! max_upload_bytes = 10485760
//!
//! [coverage]
//! default_interval_minutes = 15
//! max_points = 20000
//! ```

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "COVERAGE_CONFIG";

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {message}")]
    Read { path: PathBuf, message: String },

    #[error("Failed to parse config file {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Invalid configuration value {key}: {message}")]
    Invalid { key: &'static str, message: String },

    #[error("{name} must be {expected}, got '{value}'")]
    InvalidVar {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Complete server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub coverage: CoverageSettings,
}

/// Listener and upload settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

/// Request defaults for the coverage endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageSettings {
    #[serde(default = "default_interval_minutes")]
    pub default_interval_minutes: i64,
    /// Upper bound on timeline buckets per request.
    #[serde(default = "default_max_points")]
    pub max_points: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_max_upload_bytes() -> usize {
    50 * 1024 * 1024
}

fn default_interval_minutes() -> i64 {
    30
}

fn default_max_points() -> usize {
    crate::services::DEFAULT_MAX_POINTS
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

impl Default for CoverageSettings {
    fn default() -> Self {
        Self {
            default_interval_minutes: default_interval_minutes(),
            max_points: default_max_points(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from a TOML file. Missing keys take defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Find a config file.
    ///
    /// Uses `COVERAGE_CONFIG` when set, otherwise the first existing of
    /// `coverage.toml` and `backend/coverage.toml`.
    pub fn locate() -> Option<PathBuf> {
        if let Ok(path) = env::var(CONFIG_PATH_ENV) {
            return Some(PathBuf::from(path));
        }

        [
            PathBuf::from("coverage.toml"),
            PathBuf::from("backend/coverage.toml"),
        ]
        .into_iter()
        .find(|p| p.exists())
    }

    /// Defaults, overlaid with the located file (if any) and the environment.
    ///
    /// # Environment Variables
    /// - `HOST` (optional, default: 0.0.0.0)
    /// - `PORT` (optional, default: 8080)
    /// - `MAX_UPLOAD_BYTES` (optional, default: 52428800)
    /// - `DEFAULT_INTERVAL_MINUTES` (optional, default: 30)
    /// - `MAX_POINTS` (optional, default: 100000)
    /// - `COVERAGE_CONFIG` (optional): explicit config file path
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match Self::locate() {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env()?;
        Ok(config)
    }

    /// Override fields from environment variables.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Ok(host) = env::var("HOST") {
            self.server.host = host;
        }
        if let Some(port) = parse_var("PORT", "a valid port number")? {
            self.server.port = port;
        }
        if let Some(limit) = parse_var("MAX_UPLOAD_BYTES", "a byte count")? {
            self.server.max_upload_bytes = limit;
        }
        if let Some(minutes) = parse_var::<i64>("DEFAULT_INTERVAL_MINUTES", "a positive integer")? {
            if minutes <= 0 {
                return Err(ConfigError::InvalidVar {
                    name: "DEFAULT_INTERVAL_MINUTES",
                    expected: "a positive integer",
                    value: minutes.to_string(),
                });
            }
            self.coverage.default_interval_minutes = minutes;
        }
        if let Some(points) = parse_var::<usize>("MAX_POINTS", "a positive integer")? {
            self.coverage.max_points = points;
        }
        self.validate()
    }

    /// Reject values no request could use.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.coverage.default_interval_minutes <= 0 {
            return Err(ConfigError::Invalid {
                key: "coverage.default_interval_minutes",
                message: format!(
                    "must be a positive integer, got {}",
                    self.coverage.default_interval_minutes
                ),
            });
        }
        if self.coverage.max_points == 0 {
            return Err(ConfigError::Invalid {
                key: "coverage.max_points",
                message: "must be a positive integer, got 0".to_string(),
            });
        }
        Ok(())
    }

    /// `host:port` for the listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn parse_var<T: std::str::FromStr>(
    name: &'static str,
    expected: &'static str,
) -> Result<Option<T>, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidVar {
                name,
                expected,
                value,
            }),
        Err(_) => Ok(None),
    }
}
