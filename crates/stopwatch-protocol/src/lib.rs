//! Stopwatch UART Protocol
//!
//! This crate provides types and utilities for driving the FPGA stopwatch over
//! its UART interface. The device understands a single-character command set
//! and answers exactly one of those commands with a fixed-length reply.
//!
//! # Protocol Overview
//!
//! - **Commands** (host → device): one raw byte per command, equal to the ASCII
//!   code of the character the operator typed. No terminator, checksum or
//!   length prefix.
//! - **Replies** (device → host): only after a read command (`r`/`R`), the
//!   device sends exactly [`REPLY_LEN`] ASCII bytes holding the elapsed time.
//!
//! # Command Set
//!
//! | Char | Command | Reply |
//! |------|---------|-------|
//! | `g`/`G` | start counting | none |
//! | `s`/`S` | stop counting | none |
//! | `c`/`C` | clear the count | none |
//! | `r`/`R` | read the count | 5 bytes |
//! | `e`/`E` | host-side exit, never sent | none |
//!
//! The character is sent exactly as typed. Both cases trigger the same host
//! behavior, but nothing here assumes the device decodes them identically.
//!
//! # Example
//!
//! ```rust
//! use stopwatch_protocol::{Command, CommandKind, ReplyCodec};
//!
//! let cmd = Command::parse("R")?;
//! assert_eq!(cmd.kind(), CommandKind::Read);
//! assert_eq!(cmd.wire_byte(), Some(b'R'));
//!
//! let mut codec = ReplyCodec::new();
//! for &byte in b"12:30" {
//!     codec.push(byte)?;
//! }
//! let timestamp = codec.take_timestamp().expect("reply is complete");
//! assert_eq!(timestamp.as_str(), "12:30");
//! # Ok::<(), stopwatch_protocol::ProtocolError>(())
//! ```

mod codec;
mod commands;
mod error;
mod responses;

pub use codec::*;
pub use commands::*;
pub use error::*;
pub use responses::*;
