//! Meta HTTP surface
//!
//! Plain HTTP next to the QUIC listener. Serves the capability document and
//! an admin endpoint that shuts the whole server down.

mod routes;

use anyhow::{Context, Result};
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;

use crate::lifecycle::ServerLifecycle;

pub use routes::SPEC_DOCUMENT;

/// Build the meta router
pub fn router(lifecycle: ServerLifecycle) -> Router {
    Router::new()
        .route("/sas/spec.json", get(routes::spec_document))
        .route("/admin/stop", post(routes::admin_stop))
        .with_state(lifecycle)
}

/// Bind the meta server
pub async fn bind_meta_listener(addr: &str) -> Result<TcpListener> {
    TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind meta server to {}", addr))
}

/// Serve the meta routes until the lifecycle shuts down
pub async fn run_meta_server(listener: TcpListener, lifecycle: ServerLifecycle) -> Result<()> {
    let local_addr = listener.local_addr()?;
    tracing::info!("Meta HTTP server listening on {}", local_addr);

    axum::serve(listener, router(lifecycle.clone()))
        .with_graceful_shutdown(lifecycle.cancelled_owned())
        .await
        .context("Meta HTTP server failed")?;

    tracing::info!("Meta HTTP server stopped");
    Ok(())
}
