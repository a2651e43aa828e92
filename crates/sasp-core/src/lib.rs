//! sasp-core: Core abstractions and configuration for SASP
//!
//! This crate provides shared types and configuration structures used by
//! the server and client components.

pub mod config;
pub mod error;
pub mod net;
pub mod types;

pub use error::ConfigError;
pub use types::ConnectionId;
