//! Serial port transport.

use std::io::{self, Read, Write};
use std::time::{Duration, Instant};

use serialport::{ClearBuffer, DataBits, FlowControl, Parity, SerialPort, StopBits};
use tracing::{debug, info};

use super::Transport;
use crate::error::TransportError;

/// How long a single driver read waits before we check the deadline again.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// The stopwatch UART, 8N1 with no flow control.
pub struct SerialTransport {
    port: Option<Box<dyn SerialPort>>,
    name: String,
}

impl SerialTransport {
    /// Open the named port at the given baud rate.
    pub fn open(port: &str, baud_rate: u32) -> Result<Self, TransportError> {
        let handle = serialport::new(port, baud_rate)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .timeout(POLL_INTERVAL)
            .open()
            .map_err(|source| TransportError::Open {
                port: port.to_string(),
                source,
            })?;

        info!("Opened {} at {} baud", port, baud_rate);

        Ok(SerialTransport {
            port: Some(handle),
            name: port.to_string(),
        })
    }

    /// Port identifier this transport was opened with.
    pub fn name(&self) -> &str {
        &self.name
    }

    fn port_mut(&mut self) -> Result<&mut Box<dyn SerialPort>, TransportError> {
        self.port.as_mut().ok_or(TransportError::Closed)
    }
}

impl Transport for SerialTransport {
    fn write_byte(&mut self, byte: u8) -> Result<(), TransportError> {
        let port = self.port_mut()?;
        port.write_all(&[byte])?;
        port.flush()?;
        debug!("TX 0x{:02X}", byte);
        Ok(())
    }

    fn read_byte(&mut self, deadline: Option<Instant>) -> Result<u8, TransportError> {
        read_one(self.port_mut()?, deadline)
    }

    fn discard_input(&mut self) -> Result<(), TransportError> {
        self.port_mut()?.clear(ClearBuffer::Input)?;
        debug!("Discarded stale input on {}", self.name);
        Ok(())
    }

    fn close(&mut self) -> Result<(), TransportError> {
        if self.port.take().is_some() {
            info!("Closed {}", self.name);
        }
        Ok(())
    }
}

/// Poll `reader` until one byte arrives or `deadline` passes.
///
/// Driver timeouts only mean "nothing yet". A zero-length read means the
/// device went away and is reported as end of file.
fn read_one<R: Read + ?Sized>(reader: &mut R, deadline: Option<Instant>) -> Result<u8, TransportError> {
    let mut buf = [0u8; 1];
    loop {
        match reader.read(&mut buf) {
            Ok(0) => {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "serial port returned no data",
                )
                .into());
            }
            Ok(_) => {
                debug!("RX 0x{:02X}", buf[0]);
                return Ok(buf[0]);
            }
            Err(e) if e.kind() == io::ErrorKind::TimedOut => {}
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e.into()),
        }

        if let Some(deadline) = deadline {
            if Instant::now() >= deadline {
                return Err(TransportError::TimedOut);
            }
        }
    }
}
