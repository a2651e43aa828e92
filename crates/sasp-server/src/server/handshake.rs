//! Binding a connection's streams to the media and control roles
//!
//! A connection carries exactly two peer-initiated bidirectional streams.
//! Under [`RoleBinding::Announced`] each stream names its role in its first
//! frame and the streams may arrive in any order. Under
//! [`RoleBinding::AcceptOrder`] the first stream accepted is media and the
//! second is control.
//!
//! The whole exchange is bounded by a timeout and by the connection's
//! cancellation token; a peer that never opens its second stream cannot
//! hold a task forever.

use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::sync::CancellationToken;

use sasp_protocol::{FramedMessageChannel, RoleBinding, StreamRole};

use super::error::ServerError;

/// Source of peer-initiated bidirectional streams
#[async_trait]
pub trait StreamSource: Send {
    /// Sending half of an accepted stream
    type SendHalf: AsyncWrite + Unpin + Send;
    /// Receiving half of an accepted stream
    type RecvHalf: AsyncRead + Unpin + Send;

    /// Wait for the peer to open the next stream
    async fn accept_stream(&mut self) -> Result<(Self::SendHalf, Self::RecvHalf), ServerError>;
}

#[async_trait]
impl StreamSource for quinn::Connection {
    type SendHalf = quinn::SendStream;
    type RecvHalf = quinn::RecvStream;

    async fn accept_stream(&mut self) -> Result<(Self::SendHalf, Self::RecvHalf), ServerError> {
        let (send, recv) = self.accept_bi().await.map_err(ServerError::StreamAccept)?;
        tracing::trace!("Accepted stream {}", send.id());
        Ok((send, recv))
    }
}

/// The two streams of a connection after the handshake
pub struct BoundStreams<R, W> {
    /// Reserved stream, held open but unused
    pub media: FramedMessageChannel<R, W>,
    /// Command/response stream
    pub control: FramedMessageChannel<R, W>,
}

/// Accept two streams and bind them to roles
pub async fn bind_streams<S>(
    source: &mut S,
    binding: RoleBinding,
) -> Result<BoundStreams<S::RecvHalf, S::SendHalf>, ServerError>
where
    S: StreamSource,
{
    match binding {
        RoleBinding::AcceptOrder => bind_by_accept_order(source).await,
        RoleBinding::Announced => bind_by_announcement(source).await,
    }
}

/// Streams bound so far during a handshake
struct PendingStreams<R, W> {
    media: Option<FramedMessageChannel<R, W>>,
    control: Option<FramedMessageChannel<R, W>>,
}

impl<R, W> PendingStreams<R, W> {
    fn new() -> Self {
        Self {
            media: None,
            control: None,
        }
    }

    /// Bind `channel` to `role`; yields the bound pair once both roles are filled
    fn bind(
        &mut self,
        role: StreamRole,
        channel: FramedMessageChannel<R, W>,
    ) -> Result<Option<BoundStreams<R, W>>, ServerError> {
        let slot = match role {
            StreamRole::Media => &mut self.media,
            StreamRole::Control => &mut self.control,
        };
        if slot.is_some() {
            return Err(ServerError::DuplicateRole(role));
        }
        *slot = Some(channel);

        match (self.media.take(), self.control.take()) {
            (Some(media), Some(control)) => Ok(Some(BoundStreams { media, control })),
            (media, control) => {
                self.media = media;
                self.control = control;
                Ok(None)
            }
        }
    }
}

async fn bind_by_accept_order<S: StreamSource>(
    source: &mut S,
) -> Result<BoundStreams<S::RecvHalf, S::SendHalf>, ServerError> {
    let mut pending = PendingStreams::new();
    let mut index = 0;

    loop {
        let (send, recv) = source.accept_stream().await?;
        let role = StreamRole::by_accept_index(index);
        tracing::debug!("Stream {} bound to {}", index, role);

        if let Some(bound) = pending.bind(role, FramedMessageChannel::new(recv, send))? {
            return Ok(bound);
        }
        index += 1;
    }
}

async fn bind_by_announcement<S: StreamSource>(
    source: &mut S,
) -> Result<BoundStreams<S::RecvHalf, S::SendHalf>, ServerError> {
    let mut pending = PendingStreams::new();

    loop {
        let (send, recv) = source.accept_stream().await?;
        let mut channel = FramedMessageChannel::new(recv, send);

        let announcement = channel
            .read_frame()
            .await
            .map_err(ServerError::RoleAnnouncement)?
            .ok_or(ServerError::MissingAnnouncement)?;
        let role =
            StreamRole::from_announcement(&announcement).map_err(ServerError::RoleAnnouncement)?;
        tracing::debug!("Stream announced role {}", role);

        if let Some(bound) = pending.bind(role, channel)? {
            return Ok(bound);
        }
    }
}

/// Run the handshake bounded by `timeout` and `cancel`
///
/// Returns `Ok(None)` if cancelled before both streams were bound.
pub async fn accept_handshake<S>(
    source: &mut S,
    binding: RoleBinding,
    timeout: Duration,
    cancel: &CancellationToken,
) -> Result<Option<BoundStreams<S::RecvHalf, S::SendHalf>>, ServerError>
where
    S: StreamSource,
{
    tokio::select! {
        _ = cancel.cancelled() => Ok(None),
        result = tokio::time::timeout(timeout, bind_streams(source, binding)) => match result {
            Ok(bound) => bound.map(Some),
            Err(_) => Err(ServerError::HandshakeTimeout(timeout)),
        },
    }
}
