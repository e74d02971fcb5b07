//! Global configuration models for `.regression-kit/config.toml`.
//!
//! Every key is optional; a missing file yields [`GlobalConfig::default`].

use serde::Deserialize;
use serde::Serialize;
use std::path::PathBuf;
use ts_rs::TS;

/// Default address of the statistical service.
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000";

/// Default multipart field name for uploaded datasets.
pub const DEFAULT_UPLOAD_FIELD: &str = "file";

/// Represents global settings from `.regression-kit/config.toml`.
///
/// # Example
///
/// ```toml
/// # .regression-kit/config.toml
/// [server]
/// base_url = "http://127.0.0.1:5000"
/// timeout_secs = 30
///
/// [logging]
/// level = "debug"
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, TS)]
pub struct GlobalConfig {
    /// Where and how to reach the statistical service.
    #[serde(default)]
    pub server: ServerConfig,

    /// Log level and sink.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Connection settings for the statistical service.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
pub struct ServerConfig {
    /// Base URL that `/upload`, `/train` and `/predict` are resolved against.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Multipart field carrying the uploaded file.
    #[serde(default = "default_upload_field")]
    pub upload_field: String,

    /// Per-request timeout. Absent means requests wait indefinitely.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            upload_field: default_upload_field(),
            timeout_secs: None,
        }
    }
}

/// Logging settings.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
pub struct LoggingConfig {
    /// Filter in `env_logger` syntax, e.g. `info` or `rk_core=debug`.
    /// `RUST_LOG` takes precedence when set.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// File the TUI writes its log to, relative to the project root.
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_SERVER_URL.to_string()
}

fn default_upload_field() -> String {
    DEFAULT_UPLOAD_FIELD.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}
