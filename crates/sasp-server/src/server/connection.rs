//! Per-connection handling: handshake, control loop and teardown

use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::sync::CancellationToken;

use sasp_core::ConnectionId;
use sasp_protocol::{process_command, CloseCode, FramedMessageChannel};

use super::error::ServerError;
use super::handshake::accept_handshake;
use crate::state::ServerState;

/// Why a control loop stopped without an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopExit {
    /// Peer finished the control stream on a frame boundary
    PeerClosed,
    /// Connection or server was cancelled
    Cancelled,
}

impl LoopExit {
    fn close_code(&self) -> CloseCode {
        match self {
            LoopExit::PeerClosed => CloseCode::Normal,
            LoopExit::Cancelled => CloseCode::Shutdown,
        }
    }
}

/// Read commands from the control stream and answer each one
///
/// Every read and write races `cancel`. Any read or write error ends the
/// loop; nothing is retried.
pub async fn run_control_loop<R, W>(
    control: &mut FramedMessageChannel<R, W>,
    cancel: &CancellationToken,
) -> Result<LoopExit, ServerError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut handled: u64 = 0;

    loop {
        let frame = tokio::select! {
            _ = cancel.cancelled() => return Ok(LoopExit::Cancelled),
            frame = control.read_frame() => frame.map_err(ServerError::FrameRead)?,
        };

        let Some(command) = frame else {
            tracing::debug!("Control stream finished after {} commands", handled);
            return Ok(LoopExit::PeerClosed);
        };

        let response = process_command(&command);

        tokio::select! {
            _ = cancel.cancelled() => return Ok(LoopExit::Cancelled),
            result = control.write_frame(response) => result.map_err(ServerError::FrameWrite)?,
        }
        handled += 1;
    }
}

/// Closes the QUIC connection with the chosen code when dropped
///
/// Lives as long as the connection task, so an aborted task still closes.
pub struct ConnectionGuard {
    connection: quinn::Connection,
    code: CloseCode,
}

impl ConnectionGuard {
    /// Guard a connection, closing it normally unless told otherwise
    pub fn new(connection: quinn::Connection) -> Self {
        Self {
            connection,
            code: CloseCode::Normal,
        }
    }

    /// Set the close code sent when the guard drops
    pub fn set_close_code(&mut self, code: CloseCode) {
        self.code = code;
    }

    /// Guarded connection
    pub fn connection(&self) -> &quinn::Connection {
        &self.connection
    }
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        self.connection
            .close(self.code.as_u32().into(), self.code.reason());
    }
}

/// Complete the QUIC handshake of an incoming connection and serve it
pub(crate) async fn handle_incoming(incoming: quinn::Incoming, state: Arc<ServerState>) {
    let id = state.connection_ids.next_id();
    let cancel = state.lifecycle.child_token();
    let remote = incoming.remote_address();

    let connecting = match incoming.accept() {
        Ok(connecting) => connecting,
        Err(e) => {
            tracing::error!("{}: Failed to accept connection from {}: {}", id, remote, e);
            return;
        }
    };

    let connection = tokio::select! {
        _ = cancel.cancelled() => return,
        result = connecting => match result {
            Ok(connection) => connection,
            Err(e) => {
                let err = ServerError::Accept(e);
                tracing::error!("{}: {} (peer {})", id, err, remote);
                return;
            }
        },
    };

    tracing::info!("{}: New connection from {}", id, remote);

    let mut guard = ConnectionGuard::new(connection);
    match serve_connection(id, &guard, &state, &cancel).await {
        Ok(exit) => {
            tracing::info!("{}: Connection from {} closed ({:?})", id, remote, exit);
            guard.set_close_code(exit.close_code());
        }
        Err(e) => {
            tracing::warn!("{}: Connection from {} failed: {}", id, remote, e);
            guard.set_close_code(e.close_code());
        }
    }
}

async fn serve_connection(
    id: ConnectionId,
    guard: &ConnectionGuard,
    state: &ServerState,
    cancel: &CancellationToken,
) -> Result<LoopExit, ServerError> {
    let mut connection = guard.connection().clone();

    let bound = accept_handshake(
        &mut connection,
        state.config.role_binding,
        state.config.handshake_timeout,
        cancel,
    )
    .await?;

    let Some(mut streams) = bound else {
        return Ok(LoopExit::Cancelled);
    };
    tracing::debug!(
        "{}: Streams bound ({} binding)",
        id,
        state.config.role_binding
    );

    let result = run_control_loop(&mut streams.control, cancel).await;
    let exit = settle_loop_result(result, closed_by_peer(&connection));
    if matches!(exit, Ok(LoopExit::PeerClosed)) {
        tracing::debug!("{}: Peer closed the connection", id);
    }
    exit
}

/// Fold a connection-level close by the peer into a clean exit
///
/// Only a transport read error counts; a malformed frame stays a protocol
/// error even when the peer has already closed.
fn settle_loop_result(
    result: Result<LoopExit, ServerError>,
    peer_closed: bool,
) -> Result<LoopExit, ServerError> {
    match result {
        Err(ServerError::FrameRead(e)) if peer_closed && e.is_io() => Ok(LoopExit::PeerClosed),
        other => other,
    }
}

fn closed_by_peer(connection: &quinn::Connection) -> bool {
    matches!(
        connection.close_reason(),
        Some(quinn::ConnectionError::ApplicationClosed(_))
    )
}
