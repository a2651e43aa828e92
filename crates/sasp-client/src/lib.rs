//! sasp-client: client library for SASP servers
//!
//! Connects over QUIC, opens the media and control streams, and sends
//! commands on the control stream.

pub mod connector;
pub mod error;
pub mod tls;

pub use connector::{open_connection, SaspClient, StreamChannel};
pub use error::ClientError;
pub use tls::TrustPolicy;
