//! Stream roles and how they are bound
//!
//! A SASP connection carries exactly two streams: `media` and `control`.
//! With [`RoleBinding::Announced`] each stream opens with a single frame
//! whose payload is the role name. With [`RoleBinding::AcceptOrder`] the
//! first stream is `media` and the second is `control`.

use std::fmt;
use std::str::FromStr;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::error::ProtocolError;

/// Role of a stream within a connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamRole {
    /// Reserved stream with no defined sub-protocol
    Media,
    /// Command/response stream
    Control,
}

impl StreamRole {
    /// Role name as sent in an announcement frame
    pub fn as_str(&self) -> &'static str {
        match self {
            StreamRole::Media => "media",
            StreamRole::Control => "control",
        }
    }

    /// Payload of the announcement frame for this role
    pub fn announcement(&self) -> Bytes {
        Bytes::from_static(self.as_str().as_bytes())
    }

    /// Parse an announcement frame payload
    pub fn from_announcement(payload: &[u8]) -> Result<Self, ProtocolError> {
        match payload {
            b"media" => Ok(StreamRole::Media),
            b"control" => Ok(StreamRole::Control),
            other => Err(ProtocolError::UnknownRole(
                String::from_utf8_lossy(other).into_owned(),
            )),
        }
    }

    /// Role implied by acceptance order (0-based)
    ///
    /// The first stream is media; every later stream claims control.
    pub fn by_accept_index(index: usize) -> Self {
        match index {
            0 => StreamRole::Media,
            _ => StreamRole::Control,
        }
    }
}

impl fmt::Display for StreamRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a connection's streams are bound to roles
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleBinding {
    /// First accepted stream is media, second is control
    #[default]
    AcceptOrder,
    /// Each stream announces its role in its first frame
    Announced,
}

impl fmt::Display for RoleBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoleBinding::Announced => f.write_str("announced"),
            RoleBinding::AcceptOrder => f.write_str("accept_order"),
        }
    }
}

impl FromStr for RoleBinding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "announced" => Ok(RoleBinding::Announced),
            "accept_order" | "accept-order" => Ok(RoleBinding::AcceptOrder),
            other => Err(format!(
                "unknown role binding '{}', expected 'announced' or 'accept_order'",
                other
            )),
        }
    }
}
