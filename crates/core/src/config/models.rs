//! Resolved application configuration.
//!
//! `AppConfig` pairs the parsed `config.toml` with the project root it was
//! loaded from, so relative paths in the file can be resolved.

use rk_protocol::config_models::GlobalConfig;
use std::path::{Path, PathBuf};

/// Unified application configuration loaded from `.regression-kit/`.
///
/// # Example
///
/// ```rust,no_run
/// use rk_core::config::loader::load_config;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new(".")).await?;
/// println!("Service at {}", config.global.server.base_url);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Project root that contains `.regression-kit/`.
    pub root: PathBuf,

    /// Settings from `config.toml` after environment overrides.
    pub global: GlobalConfig,
}

impl AppConfig {
    /// Defaults rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            global: GlobalConfig::default(),
        }
    }

    /// Log file for the TUI, resolved against the project root.
    pub fn log_file(&self) -> Option<PathBuf> {
        self.global
            .logging
            .file
            .as_ref()
            .map(|file| resolve(&self.root, file))
    }
}

fn resolve(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}
