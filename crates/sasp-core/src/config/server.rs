//! Server configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

use sasp_protocol::RoleBinding;

use super::serde_utils::duration_secs;

/// ALPN identifier negotiated on the QUIC listener
pub const DEFAULT_ALPN: &str = "quic-echo-example";

/// Configuration for the SASP server
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the QUIC listener binds to
    pub bind_address: String,

    /// Address the meta HTTP server binds to
    pub meta_address: String,

    /// Application protocol identifier negotiated during TLS
    pub alpn: String,

    /// Subject alternative names for the self-signed certificate
    pub certificate_names: Vec<String>,

    /// How long a connection may take to open and bind both streams
    #[serde(with = "duration_secs")]
    pub handshake_timeout: Duration,

    /// QUIC idle timeout after which a silent peer is dropped
    #[serde(with = "duration_secs")]
    pub idle_timeout: Duration,

    /// How long shutdown waits for connections to drain
    #[serde(with = "duration_secs")]
    pub shutdown_grace: Duration,

    /// How streams are bound to media/control roles
    pub role_binding: RoleBinding,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "localhost:4433".to_string(),
            meta_address: "localhost:4432".to_string(),
            alpn: DEFAULT_ALPN.to_string(),
            certificate_names: vec!["localhost".to_string()],
            handshake_timeout: Duration::from_secs(10),
            idle_timeout: Duration::from_secs(30),
            shutdown_grace: Duration::from_secs(5),
            role_binding: RoleBinding::default(),
        }
    }
}

impl ServerConfig {
    /// ALPN identifier as raw bytes for TLS configuration
    pub fn alpn_protocols(&self) -> Vec<Vec<u8>> {
        vec![self.alpn.as_bytes().to_vec()]
    }

    /// Check values that would make the server unusable
    pub fn validate(&self) -> Result<(), crate::error::ConfigError> {
        use crate::error::ConfigError;

        if self.alpn.is_empty() {
            return Err(ConfigError::Invalid("alpn must not be empty".into()));
        }
        if self.certificate_names.is_empty() {
            return Err(ConfigError::Invalid(
                "certificate_names must list at least one name".into(),
            ));
        }
        if self.handshake_timeout.is_zero() {
            return Err(ConfigError::Invalid(
                "handshake_timeout must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = ServerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.alpn_protocols(), vec![b"quic-echo-example".to_vec()]);
        assert_eq!(config.role_binding, RoleBinding::AcceptOrder);
    }

    #[test]
    fn test_zero_handshake_timeout_rejected() {
        let config = ServerConfig {
            handshake_timeout: Duration::ZERO,
            ..ServerConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_alpn_rejected() {
        let config = ServerConfig {
            alpn: String::new(),
            ..ServerConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
