//! Error types for the control interface.

use std::io;
use std::path::PathBuf;

use stopwatch_protocol::ProtocolError;
use thiserror::Error;

/// Errors raised by a [`Transport`](crate::transport::Transport).
#[derive(Debug, Error)]
pub enum TransportError {
    /// The serial port could not be opened.
    #[error("failed to open serial port {port}: {source}")]
    Open {
        /// Port identifier that was requested.
        port: String,
        /// Underlying serial error.
        #[source]
        source: serialport::Error,
    },

    /// Serial driver error (configuration, buffer control).
    #[error("serial port error: {0}")]
    Serial(#[from] serialport::Error),

    /// Read or write failure on the connection.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A read deadline passed before a byte arrived.
    #[error("timed out waiting for data")]
    TimedOut,

    /// The connection was already closed.
    #[error("connection closed")]
    Closed,
}

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config {path}: {source}")]
    Io {
        /// Path of the config file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The config file is not valid YAML for this schema.
    #[error("failed to parse config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A value is out of range.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Errors that end a control session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The serial connection failed.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The device sent something the protocol does not allow.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Reading operator input or writing feedback failed.
    #[error("console I/O error: {0}")]
    Console(#[from] io::Error),

    /// The configured read timeout expired before the reply was complete.
    #[error("reply timed out after {received} of {expected} bytes")]
    ReplyTimeout {
        /// Bytes received before the deadline.
        received: usize,
        /// Bytes expected in a full reply.
        expected: usize,
    },
}

/// Result type alias for session operations.
pub type SessionResult<T> = Result<T, SessionError>;
