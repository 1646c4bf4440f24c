//! Replies sent by the stopwatch.
//!
//! The only reply is the timestamp answering a read command. Its content is
//! whatever the device put on the wire; no fields are parsed out of it.

use std::fmt;

use crate::codec::REPLY_LEN;
use crate::error::{ProtocolError, ProtocolResult};

/// A complete timestamp reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Timestamp {
    bytes: [u8; REPLY_LEN],
}

impl Timestamp {
    /// Build a timestamp from raw reply bytes.
    pub fn from_bytes(data: &[u8]) -> ProtocolResult<Timestamp> {
        let bytes: [u8; REPLY_LEN] =
            data.try_into().map_err(|_| ProtocolError::ReplyLength {
                expected: REPLY_LEN,
                actual: data.len(),
            })?;

        if let Some(&bad) = bytes.iter().find(|b| !b.is_ascii()) {
            return Err(ProtocolError::NonAsciiByte(bad));
        }

        Ok(Timestamp { bytes })
    }

    /// The raw reply bytes.
    pub fn as_bytes(&self) -> &[u8; REPLY_LEN] {
        &self.bytes
    }

    /// The reply as text.
    pub fn as_str(&self) -> &str {
        // ASCII was checked at construction, so this never fails.
        std::str::from_utf8(&self.bytes).unwrap_or_default()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
