//! Length-prefixed message channel over one bidirectional stream
//!
//! Wraps the receive and send halves of a stream with [`FrameCodec`] so
//! callers exchange whole payloads. The channel owns both halves, so only
//! one writer can ever interleave frames on the stream.

use bytes::Bytes;
use futures::{SinkExt, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::codec::{FramedRead, FramedWrite};

use crate::codec::FrameCodec;
use crate::error::ProtocolError;

/// Framed read/write access to a single stream
pub struct FramedMessageChannel<R, W> {
    reader: FramedRead<R, FrameCodec>,
    writer: FramedWrite<W, FrameCodec>,
}

impl<R, W> FramedMessageChannel<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    /// Create a channel from the two halves of a stream
    pub fn new(recv: R, send: W) -> Self {
        Self {
            reader: FramedRead::new(recv, FrameCodec::new()),
            writer: FramedWrite::new(send, FrameCodec::new()),
        }
    }

    /// Read the next frame payload
    ///
    /// Returns `Ok(None)` when the peer finished the stream before sending
    /// any byte of a new frame. A stream that ends mid-frame, or any I/O
    /// failure, is returned as an error; the channel should not be read
    /// again after an error.
    ///
    /// Cancel safe: partially received bytes stay buffered in the channel.
    pub async fn read_frame(&mut self) -> Result<Option<Bytes>, ProtocolError> {
        match self.reader.next().await {
            Some(Ok(payload)) => {
                tracing::trace!("Read frame with {} byte payload", payload.len());
                Ok(Some(payload))
            }
            Some(Err(e)) => Err(e),
            None => Ok(None),
        }
    }

    /// Write one frame: the length prefix followed by the payload, then flush
    pub async fn write_frame(&mut self, payload: impl Into<Bytes>) -> Result<(), ProtocolError> {
        let payload = payload.into();
        let len = payload.len();
        self.writer.send(payload).await?;
        tracing::trace!("Wrote frame with {} byte payload", len);
        Ok(())
    }

    /// Mutably borrow the send half
    pub fn send_mut(&mut self) -> &mut W {
        self.writer.get_mut()
    }

    /// Split back into the underlying halves
    ///
    /// Bytes buffered by the reader but not yet returned as a frame are lost.
    pub fn into_inner(self) -> (R, W) {
        (self.reader.into_inner(), self.writer.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::MAX_PAYLOAD_SIZE;
    use tokio::io::{duplex, AsyncWriteExt, DuplexStream, ReadHalf, WriteHalf};

    type TestChannel = FramedMessageChannel<ReadHalf<DuplexStream>, WriteHalf<DuplexStream>>;

    fn channel_pair() -> (TestChannel, TestChannel) {
        let (a, b) = duplex(128 * 1024);
        let (ar, aw) = tokio::io::split(a);
        let (br, bw) = tokio::io::split(b);
        (
            FramedMessageChannel::new(ar, aw),
            FramedMessageChannel::new(br, bw),
        )
    }

    #[tokio::test]
    async fn test_write_then_read() {
        let (mut client, mut server) = channel_pair();

        client.write_frame(&b"START"[..]).await.unwrap();
        client.write_frame(&b"STOP"[..]).await.unwrap();

        assert_eq!(server.read_frame().await.unwrap().unwrap().as_ref(), b"START");
        assert_eq!(server.read_frame().await.unwrap().unwrap().as_ref(), b"STOP");
    }

    #[tokio::test]
    async fn test_max_size_roundtrip() {
        let (mut client, mut server) = channel_pair();
        let payload = vec![0xAB; MAX_PAYLOAD_SIZE];

        let writer = tokio::spawn(async move {
            client.write_frame(payload).await.unwrap();
            client
        });

        let received = server.read_frame().await.unwrap().unwrap();
        assert_eq!(received.len(), MAX_PAYLOAD_SIZE);
        assert!(received.iter().all(|b| *b == 0xAB));
        writer.await.unwrap();
    }

    #[tokio::test]
    async fn test_oversized_write_rejected() {
        let (mut client, _server) = channel_pair();

        let result = client.write_frame(vec![0u8; MAX_PAYLOAD_SIZE + 1]).await;

        assert!(matches!(result, Err(ProtocolError::PayloadTooLarge { .. })));
    }

    #[tokio::test]
    async fn test_clean_close_returns_none() {
        let (client, mut server) = channel_pair();
        let (_recv, mut send) = client.into_inner();

        send.shutdown().await.unwrap();

        assert!(server.read_frame().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_close_mid_payload_is_error() {
        let (client, mut server) = channel_pair();
        let (_recv, mut send) = client.into_inner();

        send.write_all(&[0x00, 0x0A, b'S', b'T']).await.unwrap();
        send.shutdown().await.unwrap();

        let result = server.read_frame().await;
        assert!(matches!(result, Err(ProtocolError::TruncatedFrame { .. })));
    }

    #[tokio::test]
    async fn test_byte_at_a_time_delivery() {
        let (client, mut server) = channel_pair();
        let (_recv, mut send) = client.into_inner();

        let reader = tokio::spawn(async move { server.read_frame().await });

        for byte in [0x00u8, 0x04, b'N', b'E', b'X', b'T'] {
            send.write_all(&[byte]).await.unwrap();
            tokio::task::yield_now().await;
        }

        let frame = reader.await.unwrap().unwrap().unwrap();
        assert_eq!(frame.as_ref(), b"NEXT");
    }
}
