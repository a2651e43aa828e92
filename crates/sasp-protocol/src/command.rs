//! Control commands and their responses
//!
//! The control stream carries a closed set of commands. Parsing maps raw
//! payload bytes onto [`Command`]; [`Command::respond`] is the single
//! exhaustive mapping from command to [`Response`], so adding a command is
//! a compile-checked change rather than a new string comparison.

use std::fmt;

use bytes::Bytes;

/// A command received on the control stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// `START`
    Start,
    /// `STOP`
    Stop,
    /// Any payload that is not a recognised command
    Unsupported,
}

impl Command {
    /// Parse a command from raw payload bytes
    ///
    /// Matching is exact and case sensitive.
    pub fn parse(payload: &[u8]) -> Self {
        match payload {
            b"START" => Command::Start,
            b"STOP" => Command::Stop,
            _ => Command::Unsupported,
        }
    }

    /// Wire name of a recognised command
    pub fn wire_name(&self) -> Option<&'static str> {
        match self {
            Command::Start => Some("START"),
            Command::Stop => Some("STOP"),
            Command::Unsupported => None,
        }
    }

    /// The response this command produces
    pub fn respond(&self) -> Response {
        match self {
            Command::Start => Response::Ok,
            Command::Stop => Response::OkBye,
            Command::Unsupported => Response::NotSupported,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name().unwrap_or("<unsupported>"))
    }
}

/// A response sent back on the control stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Response {
    /// `OK`
    Ok,
    /// `OK, BYE`
    OkBye,
    /// `NOT SUPPORTED`
    NotSupported,
}

impl Response {
    /// Wire bytes of this response
    pub fn as_bytes(&self) -> &'static [u8] {
        match self {
            Response::Ok => b"OK",
            Response::OkBye => b"OK, BYE",
            Response::NotSupported => b"NOT SUPPORTED",
        }
    }

    /// Wire bytes as a frame payload
    pub fn to_payload(&self) -> Bytes {
        Bytes::from_static(self.as_bytes())
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Responses are ASCII
        f.write_str(std::str::from_utf8(self.as_bytes()).unwrap_or_default())
    }
}

/// Map a raw command payload to its raw response payload
///
/// Pure and stateless; unknown input is not an error.
pub fn process_command(payload: &[u8]) -> Bytes {
    let command = Command::parse(payload);
    let response = command.respond();
    tracing::debug!("Processing command {} -> {}", command, response);
    response.to_payload()
}
