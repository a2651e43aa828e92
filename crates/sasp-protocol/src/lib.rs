//! sasp-protocol: Wire protocol for SASP connections
//!
//! This crate defines the length-prefixed framing used on the control
//! stream, the closed set of control commands, and the role announcement
//! that binds each stream of a connection to `media` or `control`.

pub mod channel;
pub mod close;
pub mod codec;
pub mod command;
pub mod error;
pub mod frame;
pub mod role;

pub use channel::FramedMessageChannel;
pub use close::CloseCode;
pub use codec::FrameCodec;
pub use command::{process_command, Command, Response};
pub use error::ProtocolError;
pub use frame::{FrameHeader, LENGTH_PREFIX_SIZE, MAX_PAYLOAD_SIZE};
pub use role::{RoleBinding, StreamRole};
