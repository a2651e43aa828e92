//! Application close codes carried in QUIC CONNECTION_CLOSE frames

use std::fmt;

/// Why the server closed a connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CloseCode {
    /// Peer finished the control stream
    Normal,
    /// A frame could not be read or written
    ProtocolError,
    /// Streams were not opened or announced in time
    HandshakeFailed,
    /// The server is shutting down
    Shutdown,
}

impl CloseCode {
    /// Numeric code sent on the wire
    pub fn as_u32(&self) -> u32 {
        match self {
            CloseCode::Normal => 0,
            CloseCode::ProtocolError => 1,
            CloseCode::HandshakeFailed => 2,
            CloseCode::Shutdown => 3,
        }
    }

    /// Decode a numeric close code
    pub fn from_u64(code: u64) -> Option<Self> {
        match code {
            0 => Some(CloseCode::Normal),
            1 => Some(CloseCode::ProtocolError),
            2 => Some(CloseCode::HandshakeFailed),
            3 => Some(CloseCode::Shutdown),
            _ => None,
        }
    }

    /// Reason phrase sent alongside the code
    pub fn reason(&self) -> &'static [u8] {
        match self {
            CloseCode::Normal => b"bye",
            CloseCode::ProtocolError => b"protocol error",
            CloseCode::HandshakeFailed => b"handshake failed",
            CloseCode::Shutdown => b"server shutdown",
        }
    }
}

impl fmt::Display for CloseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({})",
            String::from_utf8_lossy(self.reason()),
            self.as_u32()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_roundtrip() {
        for code in [
            CloseCode::Normal,
            CloseCode::ProtocolError,
            CloseCode::HandshakeFailed,
            CloseCode::Shutdown,
        ] {
            assert_eq!(CloseCode::from_u64(code.as_u32() as u64), Some(code));
        }
        assert_eq!(CloseCode::from_u64(99), None);
    }
}
