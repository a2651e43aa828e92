//! Configuration management for SASP

mod client;
pub mod serde_utils;
mod server;

pub use client::ClientConfig;
pub use server::{ServerConfig, DEFAULT_ALPN};

use crate::error::ConfigError;
use std::path::{Path, PathBuf};

/// Get the default configuration directory
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("sasp")
}

/// Get the default server configuration file path
pub fn default_server_config_path() -> PathBuf {
    default_config_dir().join("server.toml")
}

/// Get the default client configuration file path
pub fn default_client_config_path() -> PathBuf {
    default_config_dir().join("client.toml")
}

/// Load configuration from a file
pub fn load_config<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::Invalid(format!("Failed to read config: {}", e)))?;

    let config: T = toml::from_str(&content)?;
    Ok(config)
}

/// Load configuration from `path`, or the defaults when the file is absent
///
/// A file that exists but fails to parse is still an error.
pub fn load_or_default<T>(path: &Path) -> Result<T, ConfigError>
where
    T: serde::de::DeserializeOwned + Default,
{
    match load_config(path) {
        Err(ConfigError::NotFound(_)) => {
            tracing::info!("No config at {:?}, using defaults", path);
            Ok(T::default())
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sasp_protocol::RoleBinding;
    use std::time::Duration;

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");

        let result = load_config::<ServerConfig>(&path);
        assert!(matches!(result, Err(ConfigError::NotFound(_))));

        let config: ServerConfig = load_or_default(&path).unwrap();
        assert_eq!(config.bind_address, ServerConfig::default().bind_address);
    }

    #[test]
    fn test_written_file_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("server.toml");

        let config = ServerConfig {
            bind_address: "127.0.0.1:9443".to_string(),
            handshake_timeout: Duration::from_secs(3),
            role_binding: RoleBinding::Announced,
            ..ServerConfig::default()
        };
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, toml::to_string_pretty(&config).unwrap()).unwrap();

        let loaded: ServerConfig = load_config(&path).unwrap();
        assert_eq!(loaded.bind_address, "127.0.0.1:9443");
        assert_eq!(loaded.handshake_timeout, Duration::from_secs(3));
        assert_eq!(loaded.role_binding, RoleBinding::Announced);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("server.toml");
        std::fs::write(&path, "role_binding = \"announced\"\n").unwrap();

        let loaded: ServerConfig = load_config(&path).unwrap();
        assert_eq!(loaded.role_binding, RoleBinding::Announced);
        assert_eq!(loaded.alpn, DEFAULT_ALPN);
    }

    #[test]
    fn test_invalid_toml_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("server.toml");
        std::fs::write(&path, "handshake_timeout = \"soon\"\n").unwrap();

        let result = load_or_default::<ServerConfig>(&path);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }
}
