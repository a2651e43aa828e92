//! Protocol error types

use thiserror::Error;

/// Errors that can occur during protocol operations
#[derive(Error, Debug)]
pub enum ProtocolError {
    /// Payload exceeds what the 16-bit length prefix can describe
    #[error("Payload too large: {size} bytes exceeds maximum of {max} bytes")]
    PayloadTooLarge { size: usize, max: usize },

    /// Stream ended in the middle of a frame
    #[error("Truncated frame: stream ended with {buffered} bytes of an incomplete frame")]
    TruncatedFrame { buffered: usize },

    /// Role announcement payload did not name a known role
    #[error("Unknown stream role: {0:?}")]
    UnknownRole(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ProtocolError {
    /// Whether this error was caused by the underlying transport
    pub fn is_io(&self) -> bool {
        matches!(self, ProtocolError::Io(_))
    }
}
