//! QUIC server implementation

mod connection;
mod error;
mod handshake;
mod listener;

pub use connection::{run_control_loop, ConnectionGuard, LoopExit};
pub use error::ServerError;
pub use handshake::{accept_handshake, bind_streams, BoundStreams, StreamSource};
pub use listener::SaspServer;
