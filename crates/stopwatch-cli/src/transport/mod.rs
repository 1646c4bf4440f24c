//! Byte transports carrying the stopwatch protocol.
//!
//! The session only needs four operations from the link: write one byte,
//! read one byte, drop stale input and close. [`SerialTransport`] provides
//! them over a real UART; [`ChannelTransport`] provides them in-process so
//! a session can run against a scripted device.

mod channel;
mod serial;

use std::time::Instant;

use crate::error::TransportError;

pub use channel::{ChannelTransport, DevicePeer};
pub use serial::SerialTransport;

/// A byte-oriented, ordered, full-duplex link to the stopwatch.
pub trait Transport {
    /// Write a single byte and wait until it has been handed to the driver.
    fn write_byte(&mut self, byte: u8) -> Result<(), TransportError>;

    /// Read a single byte.
    ///
    /// Blocks until a byte arrives. With `deadline` set, returns
    /// [`TransportError::TimedOut`] once the deadline has passed instead.
    fn read_byte(&mut self, deadline: Option<Instant>) -> Result<u8, TransportError>;

    /// Discard anything already received but not yet read.
    fn discard_input(&mut self) -> Result<(), TransportError>;

    /// Release the connection. Closing an already closed transport is a no-op.
    fn close(&mut self) -> Result<(), TransportError>;
}
