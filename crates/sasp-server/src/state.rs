//! State shared by every connection task

use sasp_core::config::ServerConfig;
use sasp_core::types::ConnectionIdGenerator;

use crate::lifecycle::ServerLifecycle;

/// Read-only configuration plus the lifecycle handle
///
/// Nothing in here is mutated per connection except the ID counter, so
/// connections never contend with each other.
pub struct ServerState {
    /// Configuration
    pub config: ServerConfig,
    /// Shutdown signal
    pub lifecycle: ServerLifecycle,
    /// Connection ID allocator
    pub connection_ids: ConnectionIdGenerator,
}

impl ServerState {
    /// Create server state with a fresh lifecycle
    pub fn new(config: ServerConfig) -> Self {
        Self::with_lifecycle(config, ServerLifecycle::new())
    }

    /// Create server state around an existing lifecycle
    pub fn with_lifecycle(config: ServerConfig, lifecycle: ServerLifecycle) -> Self {
        Self {
            config,
            lifecycle,
            connection_ids: ConnectionIdGenerator::new(),
        }
    }
}
