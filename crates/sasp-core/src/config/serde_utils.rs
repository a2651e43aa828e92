//! Serde adapters for SASP config fields
//!
//! Timeouts and grace periods (`handshake_timeout`, `idle_timeout`,
//! `shutdown_grace`, `connect_timeout`) are written as whole seconds in the
//! TOML files.

/// `Duration` as an integer number of seconds
///
/// Sub-second precision is dropped on write. Use with
/// `#[serde(with = "duration_secs")]` on a `Duration` field.
pub mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}
