//! Configuration file loader for the `.regression-kit/` directory.
//!
//! Only `config.toml` is read. Every key is optional, and a missing
//! directory or file yields the defaults.

use crate::config::error::ConfigError;
use crate::config::error::ConfigResult;
use crate::config::models::AppConfig;
use crate::transport::http::parse_base_url;
use log::debug;
use rk_protocol::config_models::GlobalConfig;
use std::io::ErrorKind;
use std::path::Path;

/// Name of the per-project configuration directory.
pub const CONFIG_DIR: &str = ".regression-kit";

/// Environment variable overriding `server.base_url`.
pub const SERVER_URL_ENV: &str = "RK_SERVER_URL";

/// Loads configuration from `<root>/.regression-kit/config.toml`.
///
/// `RK_SERVER_URL`, when set and non-empty, replaces the configured base URL.
///
/// # Errors
///
/// Returns `ConfigError` if:
/// - `config.toml` exists but cannot be read
/// - It is not valid TOML or has wrongly-typed keys
/// - The resulting base URL is not an http(s) URL
///
/// # Example
///
/// ```rust,no_run
/// use rk_core::config::loader::load_config;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new(".")).await?;
/// println!("Uploading as '{}'", config.global.server.upload_field);
/// # Ok(())
/// # }
/// ```
pub async fn load_config(root: &Path) -> ConfigResult<AppConfig> {
    load_config_with_server(root, None).await
}

/// Same as [`load_config`], with `server_url` (e.g. from `--server`) taking
/// precedence over both `config.toml` and `RK_SERVER_URL`.
///
/// Validation runs once, after every override is applied.
pub async fn load_config_with_server(
    root: &Path,
    server_url: Option<String>,
) -> ConfigResult<AppConfig> {
    load_config_with_env(root, server_url, |key| std::env::var(key).ok()).await
}

/// Same as [`load_config_with_server`], with environment lookups supplied by
/// the caller.
pub async fn load_config_with_env<F>(
    root: &Path,
    server_url: Option<String>,
    env: F,
) -> ConfigResult<AppConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let mut global = load_global_config(&root.join(CONFIG_DIR)).await?;

    let non_empty = |url: &String| !url.trim().is_empty();
    let override_url = server_url
        .filter(non_empty)
        .or_else(|| env(SERVER_URL_ENV).filter(non_empty));
    if let Some(url) = override_url {
        debug!("overriding server.base_url with {url}");
        global.server.base_url = url;
    }

    let config = AppConfig {
        root: root.to_path_buf(),
        global,
    };
    validate(&config)?;
    Ok(config)
}

/// Check values that parse as TOML but cannot be used.
pub fn validate(config: &AppConfig) -> ConfigResult<()> {
    parse_base_url(&config.global.server.base_url)?;

    if config.global.server.upload_field.trim().is_empty() {
        return Err(ConfigError::InvalidValue {
            key: "server.upload_field".to_string(),
            reason: "must not be empty".to_string(),
        });
    }
    if config.global.server.timeout_secs == Some(0) {
        return Err(ConfigError::InvalidValue {
            key: "server.timeout_secs".to_string(),
            reason: "must be greater than zero (omit it to disable the timeout)".to_string(),
        });
    }

    Ok(())
}

/// Loads global configuration from `config.toml`.
async fn load_global_config(rk_dir: &Path) -> ConfigResult<GlobalConfig> {
    let config_path = rk_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(GlobalConfig::default()),
        Err(source) => {
            return Err(ConfigError::FileRead {
                path: config_path,
                source,
            })
        }
    };

    let config: GlobalConfig =
        toml::from_str(&content).map_err(|source| ConfigError::TomlParse {
            path: config_path,
            source,
        })?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rk_protocol::config_models::{DEFAULT_SERVER_URL, DEFAULT_UPLOAD_FIELD};
    use std::fs;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn write_config(root: &Path, content: &str) {
        let rk_dir = root.join(CONFIG_DIR);
        fs::create_dir_all(&rk_dir).expect("Failed to create .regression-kit");
        fs::write(rk_dir.join("config.toml"), content).expect("Failed to write config.toml");
    }

    #[tokio::test]
    async fn test_load_config_missing_directory_uses_defaults() {
        let dir = tempdir().expect("Failed to create temp dir");

        let config = load_config_with_env(dir.path(), None, no_env)
            .await
            .expect("Should load defaults");

        assert_eq!(config.root, dir.path());
        assert_eq!(config.global.server.base_url, DEFAULT_SERVER_URL);
        assert_eq!(config.global.server.upload_field, DEFAULT_UPLOAD_FIELD);
        assert!(config.log_file().is_none());
    }

    #[tokio::test]
    async fn test_load_config_full_file() {
        let dir = tempdir().expect("Failed to create temp dir");
        write_config(
            dir.path(),
            r#"
[server]
base_url = "https://stats.example.com/api"
upload_field = "dataset"
timeout_secs = 20

[logging]
level = "rk_core=debug"
file = "rk.log"
"#,
        );

        let config = load_config_with_env(dir.path(), None, no_env)
            .await
            .expect("Should load config");

        assert_eq!(config.global.server.base_url, "https://stats.example.com/api");
        assert_eq!(config.global.server.upload_field, "dataset");
        assert_eq!(config.global.server.timeout_secs, Some(20));
        assert_eq!(config.global.logging.level, "rk_core=debug");
        assert_eq!(config.log_file(), Some(dir.path().join("rk.log")));
    }

    #[tokio::test]
    async fn test_env_overrides_base_url() {
        let dir = tempdir().expect("Failed to create temp dir");
        write_config(dir.path(), "[server]\nbase_url = \"http://from-file:5000\"\n");

        let config = load_config_with_env(dir.path(), None, |key| {
            (key == SERVER_URL_ENV).then(|| "http://from-env:8000".to_string())
        })
        .await
        .expect("Should load config");

        assert_eq!(config.global.server.base_url, "http://from-env:8000");
    }

    #[tokio::test]
    async fn test_server_flag_overrides_env_and_file() {
        let dir = tempdir().expect("Failed to create temp dir");
        write_config(dir.path(), "[server]\nbase_url = \"ftp://from-file\"\n");

        let config = load_config_with_env(
            dir.path(),
            Some("http://from-flag:9000".to_string()),
            |_| Some("ftp://from-env".to_string()),
        )
        .await
        .expect("Invalid file and env values are replaced before validation");

        assert_eq!(config.global.server.base_url, "http://from-flag:9000");
    }

    #[tokio::test]
    async fn test_invalid_server_flag_rejected() {
        let dir = tempdir().expect("Failed to create temp dir");

        let result = load_config_with_env(dir.path(), Some("ftp://stats".to_string()), no_env).await;

        assert!(matches!(result, Err(ConfigError::InvalidValue { key, .. }) if key == "server.base_url"));
    }

    #[tokio::test]
    async fn test_unreadable_config_is_file_read_error() {
        let dir = tempdir().expect("Failed to create temp dir");
        // A directory where the file should be cannot be read as text.
        fs::create_dir_all(dir.path().join(CONFIG_DIR).join("config.toml"))
            .expect("Failed to create directory");

        let result = load_config_with_env(dir.path(), None, no_env).await;

        assert!(matches!(result, Err(ConfigError::FileRead { .. })));
    }

    #[tokio::test]
    async fn test_empty_env_value_is_ignored() {
        let dir = tempdir().expect("Failed to create temp dir");

        let config = load_config_with_env(dir.path(), None, |_| Some("  ".to_string()))
            .await
            .expect("Should load config");

        assert_eq!(config.global.server.base_url, DEFAULT_SERVER_URL);
    }

    #[tokio::test]
    async fn test_load_config_invalid_toml() {
        let dir = tempdir().expect("Failed to create temp dir");
        write_config(dir.path(), "[server\nbase_url = ");

        let result = load_config_with_env(dir.path(), None, no_env).await;

        if let Err(ConfigError::TomlParse { path, .. }) = result {
            assert!(path.ends_with("config.toml"));
        } else {
            panic!("Expected TomlParse error");
        }
    }

    #[tokio::test]
    async fn test_load_config_invalid_url() {
        let dir = tempdir().expect("Failed to create temp dir");
        write_config(dir.path(), "[server]\nbase_url = \"localhost:5000\"\n");

        let result = load_config_with_env(dir.path(), None, no_env).await;

        assert!(matches!(result, Err(ConfigError::InvalidValue { key, .. }) if key == "server.base_url"));
    }

    #[tokio::test]
    async fn test_load_config_zero_timeout_rejected() {
        let dir = tempdir().expect("Failed to create temp dir");
        write_config(dir.path(), "[server]\ntimeout_secs = 0\n");

        let result = load_config_with_env(dir.path(), None, no_env).await;

        assert!(matches!(result, Err(ConfigError::InvalidValue { key, .. }) if key == "server.timeout_secs"));
    }

    #[test]
    fn test_validate_rejects_empty_upload_field() {
        let mut config = AppConfig::new(PathBuf::from("."));
        config.global.server.upload_field = " ".to_string();

        assert!(matches!(
            validate(&config),
            Err(ConfigError::InvalidValue { key, .. }) if key == "server.upload_field"
        ));
    }
}
