use serde::Deserialize;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::classifier::ClassifierLimits;
use crate::directory::{CountryEntry, OperatorEntry};

/// Root configuration for msisdnd
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Logging settings
    #[serde(default)]
    pub telemetry: TelemetryConfig,

    /// Digit-count bounds for the classifier
    #[serde(default)]
    pub classifier: ClassifierLimits,

    /// Prefix directory sources
    #[serde(default)]
    pub directory: DirectoryConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address
    #[serde(default = "default_server_address")]
    pub address: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: default_server_address(),
        }
    }
}

fn default_server_address() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8080))
}

/// Telemetry configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    /// Log level (EnvFilter directive, overridden by RUST_LOG)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Emit JSON logs
    #[serde(default)]
    pub json_logs: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json_logs: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Prefix directory sources.
///
/// Assembled as: built-in table (if enabled), then entries from `path`,
/// then inline entries.
#[derive(Debug, Clone, Deserialize)]
pub struct DirectoryConfig {
    /// Start from the built-in table
    #[serde(default = "default_true")]
    pub builtin: bool,

    /// Extra entries file (YAML), relative paths resolve against the config file
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Inline country entries
    #[serde(default)]
    pub countries: Vec<CountryEntry>,

    /// Inline operator entries
    #[serde(default)]
    pub operators: Vec<OperatorEntry>,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            builtin: true,
            path: None,
            countries: Vec::new(),
            operators: Vec::new(),
        }
    }
}

fn default_true() -> bool {
    true
}

/// Contents of a directory entries file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DirectoryFile {
    #[serde(default)]
    pub countries: Vec<CountryEntry>,

    #[serde(default)]
    pub operators: Vec<OperatorEntry>,
}
