//! dashcast configuration management.
//!
//! Handles the configuration file at:
//! - Linux: ~/.config/dashcast/config.toml
//! - macOS: ~/Library/Application Support/dashcast/config.toml
//! - Windows: %APPDATA%\dashcast\config.toml
//!
//! A missing file means defaults; a malformed one is an error.

use std::fs;
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{DashError, Result};
use crate::socket_server::{DEFAULT_BACKLOG, DEFAULT_PORT};

/// dashcast configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct DashConfig {
    /// Listening socket settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Frame cadence settings
    #[serde(default)]
    pub broadcast: BroadcastConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Listening socket configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    /// Interface to bind (all interfaces by default)
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Listen backlog depth
    #[serde(default = "default_backlog")]
    pub backlog: i32,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_backlog() -> i32 {
    DEFAULT_BACKLOG
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            backlog: default_backlog(),
        }
    }
}

impl ServerConfig {
    /// Socket address to bind
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        let ip: IpAddr = self.host.parse().map_err(|e| DashError::ConfigError {
            message: format!("Invalid host '{}': {}", self.host, e),
        })?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Frame cadence configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BroadcastConfig {
    /// Minimum time between emitted frames, in milliseconds
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
}

fn default_interval_ms() -> u64 {
    500
}

impl Default for BroadcastConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
        }
    }
}

impl BroadcastConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl DashConfig {
    /// Default configuration file path, if the platform has a config dir
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("dashcast").join("config.toml"))
    }

    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        match Self::default_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| DashError::ConfigError {
            message: format!("Failed to parse {}: {}", path.display(), e),
        })
    }

    /// Render as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| DashError::ConfigError {
            message: format!("Failed to serialize config: {}", e),
        })
    }
}
