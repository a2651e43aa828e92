//! sasp-server: QUIC server for the SASP control protocol
//!
//! The server accepts QUIC connections, binds each connection's two
//! streams to the `media` and `control` roles, and answers commands on the
//! control stream until the peer finishes, an I/O error occurs, or the
//! server shuts down. A small HTTP surface serves the capability document
//! and an admin shutdown endpoint.

pub mod lifecycle;
pub mod meta;
pub mod server;
pub mod state;
pub mod tls;

pub use lifecycle::ServerLifecycle;
pub use server::{SaspServer, ServerError};
pub use state::ServerState;
pub use tls::TlsIdentity;
