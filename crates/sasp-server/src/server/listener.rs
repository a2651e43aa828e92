//! QUIC listener
//!
//! Accepts incoming connections and spawns a handler task for each one.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::task::JoinSet;

use sasp_core::net::resolve_addr;
use sasp_protocol::CloseCode;

use crate::server::connection::handle_incoming;
use crate::state::ServerState;
use crate::tls::TlsIdentity;

/// QUIC server bound to a UDP socket
pub struct SaspServer {
    state: Arc<ServerState>,
    endpoint: quinn::Endpoint,
}

impl SaspServer {
    /// Bind the QUIC endpoint to `state.config.bind_address`
    ///
    /// Must be called from within a Tokio runtime.
    pub fn bind(state: Arc<ServerState>, identity: &TlsIdentity) -> Result<Self> {
        let addr = resolve_addr(&state.config.bind_address)
            .with_context(|| format!("Failed to resolve {}", state.config.bind_address))?;
        let server_config = identity.quic_server_config(&state.config)?;

        let endpoint = quinn::Endpoint::server(server_config, addr)
            .with_context(|| format!("Failed to bind to {}", addr))?;

        Ok(Self { state, endpoint })
    }

    /// Address the endpoint is listening on
    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.endpoint
            .local_addr()
            .context("Failed to read local address")
    }

    /// Run the accept loop until the server shuts down
    pub async fn run(self) -> Result<()> {
        let local_addr = self.local_addr()?;
        tracing::info!("QUIC server listening on {}", local_addr);

        let mut connections = JoinSet::new();

        loop {
            tokio::select! {
                _ = self.state.lifecycle.cancelled() => {
                    tracing::info!("QUIC server shutting down");
                    break;
                }

                Some(finished) = connections.join_next(), if !connections.is_empty() => {
                    if let Err(e) = finished {
                        tracing::error!("Connection task failed: {}", e);
                    }
                }

                incoming = self.endpoint.accept() => {
                    match incoming {
                        Some(incoming) => {
                            connections.spawn(handle_incoming(incoming, Arc::clone(&self.state)));
                        }
                        None => {
                            tracing::warn!("QUIC endpoint closed");
                            break;
                        }
                    }
                }
            }
        }

        self.shutdown(connections).await;
        Ok(())
    }

    async fn shutdown(&self, mut connections: JoinSet<()>) {
        let grace = self.state.config.shutdown_grace;
        let active = connections.len();
        if active > 0 {
            tracing::info!("Waiting for {} connection(s) to close", active);
        }

        let drained = tokio::time::timeout(grace, async {
            while connections.join_next().await.is_some() {}
        })
        .await;
        if drained.is_err() {
            tracing::warn!("Aborting {} connection(s) after {:?}", connections.len(), grace);
            connections.shutdown().await;
        }

        let code = CloseCode::Shutdown;
        self.endpoint.close(code.as_u32().into(), code.reason());
        if tokio::time::timeout(grace, self.endpoint.wait_idle())
            .await
            .is_err()
        {
            tracing::warn!("QUIC endpoint did not go idle within {:?}", grace);
        }
    }
}
