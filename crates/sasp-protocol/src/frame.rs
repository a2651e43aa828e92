//! Frame header encoding/decoding
//!
//! Every frame starts with a 2-byte header holding the payload length as an
//! unsigned big-endian integer, followed by exactly that many payload bytes:
//!
//! ```text
//! ┌────────────────┬──────────────────────┐
//! │ Length (2B BE) │ Payload (Length B)   │
//! └────────────────┴──────────────────────┘
//! ```

use bytes::{Buf, BufMut, BytesMut};

use crate::error::ProtocolError;

/// Size of the length prefix in bytes
pub const LENGTH_PREFIX_SIZE: usize = 2;

/// Maximum payload size (limited by the 16-bit length field)
pub const MAX_PAYLOAD_SIZE: usize = u16::MAX as usize;

/// Frame header carrying the payload length
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    /// Length of the payload in bytes
    pub payload_length: u16,
}

impl FrameHeader {
    /// Create a header for a payload of the given size
    ///
    /// Fails instead of truncating when the payload does not fit in 16 bits.
    pub fn for_payload(len: usize) -> Result<Self, ProtocolError> {
        let payload_length = u16::try_from(len).map_err(|_| ProtocolError::PayloadTooLarge {
            size: len,
            max: MAX_PAYLOAD_SIZE,
        })?;
        Ok(Self { payload_length })
    }

    /// Encode the header into a byte buffer
    pub fn encode(&self, dst: &mut BytesMut) {
        dst.reserve(LENGTH_PREFIX_SIZE);
        dst.put_u16(self.payload_length);
    }

    /// Decode a header from a byte buffer
    ///
    /// Returns None if there aren't enough bytes in the buffer.
    pub fn decode(src: &mut BytesMut) -> Option<Self> {
        if src.len() < LENGTH_PREFIX_SIZE {
            return None;
        }

        Some(Self {
            payload_length: src.get_u16(),
        })
    }

    /// Payload length as usize
    pub(crate) fn payload_len(&self) -> usize {
        self.payload_length as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_is_big_endian() {
        let header = FrameHeader::for_payload(0x0102).unwrap();

        let mut buf = BytesMut::with_capacity(LENGTH_PREFIX_SIZE);
        header.encode(&mut buf);

        assert_eq!(&buf[..], &[0x01, 0x02]);
    }

    #[test]
    fn test_header_roundtrip() {
        let header = FrameHeader::for_payload(12345).unwrap();

        let mut buf = BytesMut::new();
        header.encode(&mut buf);

        let decoded = FrameHeader::decode(&mut buf).unwrap();
        assert_eq!(decoded, header);
        assert!(buf.is_empty());
    }

    #[test]
    fn test_max_payload_length() {
        let header = FrameHeader::for_payload(MAX_PAYLOAD_SIZE).unwrap();
        assert_eq!(header.payload_len(), 65535);
    }

    #[test]
    fn test_oversized_payload_rejected() {
        let result = FrameHeader::for_payload(MAX_PAYLOAD_SIZE + 1);
        assert!(matches!(
            result,
            Err(ProtocolError::PayloadTooLarge {
                size: 65536,
                max: 65535
            })
        ));
    }

    #[test]
    fn test_insufficient_bytes() {
        let mut buf = BytesMut::from(&[0u8][..]);
        assert!(FrameHeader::decode(&mut buf).is_none());
        // Nothing consumed
        assert_eq!(buf.len(), 1);
    }
}
