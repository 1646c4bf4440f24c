//! # stopwatch-cli
//!
//! Interactive control interface for the UART stopwatch.
//!
//! The binary reads single-character commands from stdin and forwards them
//! to the device over a serial port; see [`stopwatch_protocol`] for the wire
//! format. The library exposes the pieces so a session can also be driven
//! programmatically:
//!
//! ```no_run
//! use stopwatch_cli::{Session, SessionConfig, SerialTransport};
//!
//! let transport = SerialTransport::open("/dev/ttyUSB0", 19200)?;
//! let session = Session::open(transport, SessionConfig::default())?;
//! let stats = session.run(std::io::stdin().lock(), std::io::stdout())?;
//! println!("{} commands sent", stats.commands_sent);
//! # Ok::<(), stopwatch_cli::SessionError>(())
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod session;
pub mod transport;

pub use config::{ConfigOverrides, StopwatchConfig};
pub use error::{ConfigError, SessionError, SessionResult, TransportError};
pub use session::{Session, SessionConfig, SessionState, SessionStats};
pub use transport::{ChannelTransport, DevicePeer, SerialTransport, Transport};
