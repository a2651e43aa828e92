//! Client error types

use std::time::Duration;

use sasp_protocol::{CloseCode, ProtocolError};
use thiserror::Error;

/// Errors returned by the SASP client
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server address could not be resolved
    #[error("Failed to resolve {address}: {reason}")]
    Resolve { address: String, reason: String },

    /// TLS configuration could not be built
    #[error("TLS configuration error: {0}")]
    Tls(String),

    /// The local UDP endpoint could not be created
    #[error("Failed to create endpoint: {0}")]
    Endpoint(#[source] std::io::Error),

    /// The connection attempt was rejected locally
    #[error("Failed to start connection: {0}")]
    Connect(#[from] quinn::ConnectError),

    /// The connection failed or was closed
    #[error("Connection error: {0}")]
    Connection(#[from] quinn::ConnectionError),

    /// The connection was not established in time
    #[error("Connection timed out after {0:?}")]
    ConnectTimeout(Duration),

    /// Reading or writing a frame failed
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// The server finished the control stream without answering
    #[error("Control stream closed by server")]
    StreamClosed,

    /// The server closed the connection with an application code
    #[error("Server closed the connection: {0}")]
    Closed(CloseCode),

    /// The server closed the connection with a code this client does not know
    #[error("Server closed the connection with unknown code {0}")]
    UnknownCloseCode(u64),
}

impl ClientError {
    /// Whether the error means the server is unreachable
    pub fn is_unreachable(&self) -> bool {
        matches!(
            self,
            ClientError::Resolve { .. }
                | ClientError::ConnectTimeout(_)
                | ClientError::Connection(quinn::ConnectionError::TimedOut)
        )
    }
}
