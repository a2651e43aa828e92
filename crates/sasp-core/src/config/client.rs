//! Client configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

use sasp_protocol::RoleBinding;

use super::serde_utils::duration_secs;
use super::server::DEFAULT_ALPN;

/// Configuration for a SASP client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Server address (host:port)
    pub server_address: String,

    /// Name checked against the server certificate
    pub server_name: String,

    /// Application protocol identifier offered during TLS
    pub alpn: String,

    /// How the client marks its media and control streams
    pub role_binding: RoleBinding,

    /// Skip server certificate verification
    pub insecure: bool,

    /// Timeout for establishing the connection
    #[serde(with = "duration_secs")]
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_address: "localhost:4433".to_string(),
            server_name: "localhost".to_string(),
            alpn: DEFAULT_ALPN.to_string(),
            role_binding: RoleBinding::default(),
            insecure: false,
            connect_timeout: Duration::from_secs(10),
        }
    }
}
