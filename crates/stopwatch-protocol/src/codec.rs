//! Reply accumulation for the read command.
//!
//! After a read command the device sends exactly [`REPLY_LEN`] bytes. The
//! host reads them strictly one at a time and feeds each one into a
//! [`ReplyCodec`] until the reply is complete.

use bytes::BytesMut;
use tracing::trace;

use crate::error::{ProtocolError, ProtocolResult};
use crate::responses::Timestamp;

/// Number of bytes in a timestamp reply.
pub const REPLY_LEN: usize = 5;

/// Accumulator for a single timestamp reply.
#[derive(Debug)]
pub struct ReplyCodec {
    buffer: BytesMut,
}

impl Default for ReplyCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl ReplyCodec {
    /// Create an empty codec.
    pub fn new() -> Self {
        ReplyCodec {
            buffer: BytesMut::with_capacity(REPLY_LEN),
        }
    }

    /// Add one received byte.
    ///
    /// Non-ASCII bytes are rejected and leave the buffer untouched.
    pub fn push(&mut self, byte: u8) -> ProtocolResult<()> {
        if self.is_complete() {
            return Err(ProtocolError::ReplyOverflow { max: REPLY_LEN });
        }
        if !byte.is_ascii() {
            return Err(ProtocolError::NonAsciiByte(byte));
        }

        self.buffer.extend_from_slice(&[byte]);
        trace!("reply byte {}/{}: {:?}", self.buffer.len(), REPLY_LEN, byte as char);
        Ok(())
    }

    /// Number of bytes received so far.
    pub fn received(&self) -> usize {
        self.buffer.len()
    }

    /// Number of bytes still missing.
    pub fn remaining(&self) -> usize {
        REPLY_LEN - self.buffer.len()
    }

    /// Whether all reply bytes have arrived.
    pub fn is_complete(&self) -> bool {
        self.buffer.len() == REPLY_LEN
    }

    /// Take the finished timestamp, leaving the codec empty.
    ///
    /// Returns `None` while the reply is incomplete.
    pub fn take_timestamp(&mut self) -> Option<Timestamp> {
        if !self.is_complete() {
            return None;
        }
        let data = self.buffer.split_to(REPLY_LEN);
        // Every byte was checked in `push`.
        Timestamp::from_bytes(&data).ok()
    }

    /// Discard any partial reply.
    pub fn reset(&mut self) {
        self.buffer.clear();
    }

    /// Get the current buffer contents as a string (for debugging).
    pub fn buffer_as_str(&self) -> String {
        String::from_utf8_lossy(&self.buffer).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complete_reply() {
        let mut codec = ReplyCodec::new();
        for &byte in b"12:30" {
            assert!(!codec.is_complete());
            codec.push(byte).unwrap();
        }

        assert!(codec.is_complete());
        assert_eq!(codec.take_timestamp().unwrap().as_str(), "12:30");
        assert_eq!(codec.received(), 0);
    }

    #[test]
    fn test_partial_reply() {
        let mut codec = ReplyCodec::new();
        codec.push(b'0').unwrap();
        codec.push(b'9').unwrap();

        assert_eq!(codec.received(), 2);
        assert_eq!(codec.remaining(), 3);
        assert!(codec.take_timestamp().is_none());
        assert_eq!(codec.buffer_as_str(), "09");
    }

    #[test]
    fn test_rejects_non_ascii() {
        let mut codec = ReplyCodec::new();
        codec.push(b'1').unwrap();

        assert_eq!(codec.push(0xC3), Err(ProtocolError::NonAsciiByte(0xC3)));
        assert_eq!(codec.received(), 1);
    }

    #[test]
    fn test_overflow() {
        let mut codec = ReplyCodec::new();
        for &byte in b"00:00" {
            codec.push(byte).unwrap();
        }

        assert_eq!(
            codec.push(b'0'),
            Err(ProtocolError::ReplyOverflow { max: REPLY_LEN })
        );
    }

    #[test]
    fn test_reset_discards_partial() {
        let mut codec = ReplyCodec::new();
        codec.push(b'5').unwrap();
        codec.reset();

        for &byte in b"59:59" {
            codec.push(byte).unwrap();
        }
        assert_eq!(codec.take_timestamp().unwrap().as_str(), "59:59");
    }
}
