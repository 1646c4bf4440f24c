//! The command interface loop.
//!
//! A [`Session`] owns the transport for its whole life. Each line of operator
//! input is classified into a [`Command`]; valid commands put exactly one byte
//! on the wire, and the read command then collects the 5-byte timestamp.
//! The exit command closes the transport and moves the session to
//! [`SessionState::Terminated`].
//!
//! Reads block without limit unless [`SessionConfig::read_timeout`] is set.
//! A device that never finishes its reply therefore hangs the session; this
//! matches the hardware contract, which has no recovery mechanism.

use std::fmt;
use std::io::{BufRead, Write};
use std::time::{Duration, Instant};

use stopwatch_protocol::{
    banner, Command, CommandKind, ProtocolError, ReplyCodec, Timestamp, REPLY_LEN,
};
use tracing::{debug, info, warn};

use crate::error::{SessionError, SessionResult, TransportError};
use crate::transport::Transport;

/// Feedback printed for input that is not a command.
pub const INVALID_INPUT_NOTICE: &str = "invalid input";

/// Session settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionConfig {
    /// Upper bound on the whole 5-byte reply to a read command.
    /// `None` blocks until the reply arrives.
    pub read_timeout: Option<Duration>,
}

/// Externally visible session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Waiting for the next line of input.
    AwaitingInput,
    /// Exit was requested or input ended; the transport is closed.
    Terminated,
}

/// Counters kept over a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Command bytes written to the device.
    pub commands_sent: u32,
    /// Timestamp replies received.
    pub replies_received: u32,
    /// Input lines rejected as invalid.
    pub invalid_inputs: u32,
}

/// Loop controller owning the connection to the stopwatch.
pub struct Session<T: Transport> {
    transport: T,
    config: SessionConfig,
    codec: ReplyCodec,
    state: SessionState,
    stats: SessionStats,
}

impl<T: Transport> Session<T> {
    /// Start a session on an open transport, discarding stale input first.
    pub fn open(mut transport: T, config: SessionConfig) -> SessionResult<Self> {
        transport.discard_input()?;
        debug!("Session opened (read_timeout={:?})", config.read_timeout);

        Ok(Session {
            transport,
            config,
            codec: ReplyCodec::new(),
            state: SessionState::AwaitingInput,
            stats: SessionStats::default(),
        })
    }

    /// Current state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Counters so far.
    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    /// Print the banner, then handle input lines until exit or end of input.
    pub fn run<R: BufRead, W: Write>(mut self, mut input: R, mut out: W) -> SessionResult<SessionStats> {
        writeln!(out, "{}", banner())?;
        out.flush()?;

        let mut line = Vec::new();
        while self.state == SessionState::AwaitingInput {
            line.clear();
            if input.read_until(b'\n', &mut line)? == 0 {
                warn!("Input ended without an exit command");
                self.terminate()?;
                break;
            }
            let text = match std::str::from_utf8(strip_line_ending(&line)) {
                Ok(text) => text,
                Err(e) => {
                    self.reject(&mut out, &e)?;
                    continue;
                }
            };
            self.handle_line(text, &mut out)?;
        }

        info!(
            "Session ended: {} commands sent, {} replies received, {} invalid inputs",
            self.stats.commands_sent, self.stats.replies_received, self.stats.invalid_inputs
        );
        Ok(self.stats)
    }

    /// Handle one line of input (without its line terminator).
    ///
    /// Invalid input is reported to `out` and does not change any state.
    /// Once terminated, further lines are ignored.
    pub fn handle_line<W: Write>(&mut self, line: &str, out: &mut W) -> SessionResult<SessionState> {
        if self.state == SessionState::Terminated {
            return Ok(self.state);
        }

        let command = match Command::parse(line) {
            Ok(command) => command,
            Err(e) => {
                self.reject(out, &e)?;
                return Ok(self.state);
            }
        };

        match command.kind() {
            CommandKind::Exit => {
                self.terminate()?;
                notice(out, CommandKind::Exit.notice())?;
            }
            CommandKind::Read => {
                self.send(&command)?;
                notice(out, CommandKind::Read.notice())?;
                let timestamp = self.read_reply()?;
                writeln!(out, "{}", timestamp)?;
                out.flush()?;
            }
            kind => {
                notice(out, kind.notice())?;
                self.send(&command)?;
            }
        }

        Ok(self.state)
    }

    /// Report input that is not a command. Nothing is written to the device.
    fn reject<W: Write>(&mut self, out: &mut W, reason: &dyn fmt::Display) -> SessionResult<()> {
        debug!("Rejected input: {}", reason);
        self.stats.invalid_inputs += 1;
        notice(out, INVALID_INPUT_NOTICE)
    }

    /// Write the command byte.
    fn send(&mut self, command: &Command) -> SessionResult<()> {
        if let Some(byte) = command.wire_byte() {
            self.transport.write_byte(byte)?;
            self.stats.commands_sent += 1;
            debug!("Sent {:?} as {:?}", command.kind(), command.as_char());
        }
        Ok(())
    }

    /// Collect the timestamp, one byte at a time.
    fn read_reply(&mut self) -> SessionResult<Timestamp> {
        self.codec.reset();
        let deadline = self.config.read_timeout.map(|timeout| Instant::now() + timeout);

        while !self.codec.is_complete() {
            let byte = match self.transport.read_byte(deadline) {
                Ok(byte) => byte,
                Err(TransportError::TimedOut) => {
                    warn!(
                        "Reply timed out with {} of {} bytes: {:?}",
                        self.codec.received(),
                        REPLY_LEN,
                        self.codec.buffer_as_str()
                    );
                    return Err(SessionError::ReplyTimeout {
                        received: self.codec.received(),
                        expected: REPLY_LEN,
                    });
                }
                Err(e) => return Err(e.into()),
            };
            self.codec.push(byte)?;
        }

        let timestamp = self
            .codec
            .take_timestamp()
            .ok_or(ProtocolError::ReplyLength {
                expected: REPLY_LEN,
                actual: self.codec.received(),
            })?;
        self.stats.replies_received += 1;
        debug!("Received timestamp {:?}", timestamp.as_str());
        Ok(timestamp)
    }

    /// Close the transport and enter the final state.
    fn terminate(&mut self) -> SessionResult<()> {
        self.transport.close()?;
        self.state = SessionState::Terminated;
        Ok(())
    }
}

/// Print one feedback line followed by a blank line.
fn notice<W: Write>(out: &mut W, text: &str) -> SessionResult<()> {
    writeln!(out, "{}", text)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}

/// Remove a trailing `\n` or `\r\n`, nothing else.
fn strip_line_ending(line: &[u8]) -> &[u8] {
    match line.strip_suffix(b"\n") {
        Some(line) => line.strip_suffix(b"\r").unwrap_or(line),
        None => line,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::ChannelTransport;

    #[test]
    fn test_strip_line_ending() {
        assert_eq!(strip_line_ending(b"g\n"), b"g");
        assert_eq!(strip_line_ending(b"g\r\n"), b"g");
        assert_eq!(strip_line_ending(b"g"), b"g");
        assert_eq!(strip_line_ending(b" g \n"), b" g ");
        assert_eq!(strip_line_ending(b"\n"), b"");
        assert_eq!(strip_line_ending(b"g\r"), b"g\r");
        assert_eq!(strip_line_ending(&[0xFF, b'\n']), &[0xFFu8]);
    }

    #[test]
    fn test_open_discards_stale_input() {
        let (host, device) = ChannelTransport::new_pair();
        device.send(b"junk");

        let mut session = Session::open(host, SessionConfig::default()).unwrap();
        device.send(b"00:42");

        let mut out = Vec::new();
        session.handle_line("r", &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.ends_with("00:42\n"), "output was {:?}", text);
    }

    #[test]
    fn test_notice_precedes_reply() {
        let (host, device) = ChannelTransport::new_pair();
        let mut session = Session::open(host, SessionConfig::default()).unwrap();
        device.send(b"01:02");

        let mut out = Vec::new();
        session.handle_line("R", &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "receive\n\n01:02\n");
        assert_eq!(device.received(), vec![b'R']);
    }

    #[test]
    fn test_terminated_session_ignores_input() {
        let (host, device) = ChannelTransport::new_pair();
        let mut session = Session::open(host, SessionConfig::default()).unwrap();

        let mut out = Vec::new();
        assert_eq!(session.handle_line("e", &mut out).unwrap(), SessionState::Terminated);
        out.clear();

        assert_eq!(session.handle_line("g", &mut out).unwrap(), SessionState::Terminated);
        assert!(out.is_empty());
        assert!(device.received().is_empty());
        assert_eq!(device.close_count(), 1);
    }

    #[test]
    fn test_non_ascii_reply_is_protocol_error() {
        let (host, device) = ChannelTransport::new_pair();
        let mut session = Session::open(host, SessionConfig::default()).unwrap();
        device.send(&[b'1', 0x80]);

        let mut out = Vec::new();
        let result = session.handle_line("r", &mut out);
        assert!(matches!(result, Err(SessionError::Protocol(_))));
    }
}
