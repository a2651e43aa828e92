//! Server error types

use std::time::Duration;

use sasp_protocol::{CloseCode, ProtocolError, StreamRole};
use thiserror::Error;

/// Errors that end a single connection
///
/// None of these affect other connections or the accept loop.
#[derive(Error, Debug)]
pub enum ServerError {
    /// The QUIC/TLS handshake of an incoming connection failed
    #[error("Failed to accept connection: {0}")]
    Accept(#[source] quinn::ConnectionError),

    /// Waiting for a peer-initiated stream failed
    #[error("Failed to accept stream: {0}")]
    StreamAccept(#[source] quinn::ConnectionError),

    /// The peer did not open and bind both streams in time
    #[error("Handshake timed out after {0:?}")]
    HandshakeTimeout(Duration),

    /// A stream's role announcement was missing or invalid
    #[error("Invalid role announcement: {0}")]
    RoleAnnouncement(#[source] ProtocolError),

    /// A stream closed before announcing its role
    #[error("Stream closed before announcing its role")]
    MissingAnnouncement,

    /// Two streams announced the same role
    #[error("Stream role '{0}' announced twice")]
    DuplicateRole(StreamRole),

    /// Reading a frame failed for a reason other than a clean close
    #[error("Failed to read frame: {0}")]
    FrameRead(#[source] ProtocolError),

    /// Writing a frame failed
    #[error("Failed to write frame: {0}")]
    FrameWrite(#[source] ProtocolError),
}

impl ServerError {
    /// Application close code reported to the peer for this error
    pub fn close_code(&self) -> CloseCode {
        match self {
            ServerError::Accept(_) | ServerError::FrameRead(_) | ServerError::FrameWrite(_) => {
                CloseCode::ProtocolError
            }
            ServerError::StreamAccept(_)
            | ServerError::HandshakeTimeout(_)
            | ServerError::RoleAnnouncement(_)
            | ServerError::MissingAnnouncement
            | ServerError::DuplicateRole(_) => CloseCode::HandshakeFailed,
        }
    }
}
