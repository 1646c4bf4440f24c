//! Error types for the stopwatch protocol.

use thiserror::Error;

/// Errors that can occur when working with the stopwatch protocol.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Input does not name one of the single-character commands.
    #[error("invalid command: {0:?}")]
    InvalidCommand(String),

    /// The device sent a byte outside the ASCII range.
    #[error("non-ASCII byte in reply: 0x{0:02X}")]
    NonAsciiByte(u8),

    /// A reply had the wrong number of bytes.
    #[error("reply length mismatch: expected {expected} bytes, got {actual}")]
    ReplyLength {
        /// Expected reply length.
        expected: usize,
        /// Actual length received.
        actual: usize,
    },

    /// More bytes were pushed into a complete reply.
    #[error("reply overflow: max {max} bytes")]
    ReplyOverflow {
        /// Maximum reply length.
        max: usize,
    },
}

/// Result type alias for protocol operations.
pub type ProtocolResult<T> = Result<T, ProtocolError>;
