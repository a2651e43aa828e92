//! Tokio codec for length-prefixed frames

use bytes::{Bytes, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use crate::error::ProtocolError;
use crate::frame::FrameHeader;

/// Codec for encoding/decoding length-prefixed frames
///
/// Frames carry opaque payloads; interpretation is left to the caller.
#[derive(Debug, Default)]
pub struct FrameCodec {
    /// Header already consumed while waiting for its payload
    pending_header: Option<FrameHeader>,
}

impl FrameCodec {
    /// Create a new codec
    pub fn new() -> Self {
        Self {
            pending_header: None,
        }
    }
}

impl Decoder for FrameCodec {
    type Item = Bytes;
    type Error = ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        let header = match self.pending_header.take() {
            Some(h) => h,
            None => match FrameHeader::decode(src) {
                Some(h) => h,
                None => return Ok(None),
            },
        };

        let payload_len = header.payload_len();
        if src.len() < payload_len {
            src.reserve(payload_len - src.len());
            self.pending_header = Some(header);
            return Ok(None);
        }

        Ok(Some(src.split_to(payload_len).freeze()))
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if let Some(frame) = self.decode(src)? {
            return Ok(Some(frame));
        }

        // Clean end of stream only if no part of a frame is outstanding
        match self.pending_header.take() {
            Some(header) => Err(ProtocolError::TruncatedFrame {
                buffered: crate::frame::LENGTH_PREFIX_SIZE + src.len().min(header.payload_len()),
            }),
            None if !src.is_empty() => Err(ProtocolError::TruncatedFrame {
                buffered: src.len(),
            }),
            None => Ok(None),
        }
    }
}

impl Encoder<Bytes> for FrameCodec {
    type Error = ProtocolError;

    fn encode(&mut self, payload: Bytes, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let header = FrameHeader::for_payload(payload.len())?;

        dst.reserve(crate::frame::LENGTH_PREFIX_SIZE + payload.len());
        header.encode(dst);
        dst.extend_from_slice(&payload);

        Ok(())
    }
}
