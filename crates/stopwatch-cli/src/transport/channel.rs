//! In-process transport pair.
//!
//! [`ChannelTransport::new_pair`] returns the host end and a [`DevicePeer`]
//! playing the stopwatch. The peer observes every byte the host writes and
//! queues reply bytes for the host to read, from any thread.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender, TryRecvError};

use super::Transport;
use crate::error::TransportError;

/// Host end of an in-process link.
pub struct ChannelTransport {
    to_device: Sender<u8>,
    from_device: Receiver<u8>,
    close_count: Arc<AtomicUsize>,
    closed: bool,
}

/// Device end of an in-process link.
#[derive(Clone)]
pub struct DevicePeer {
    from_host: Receiver<u8>,
    to_host: Sender<u8>,
    close_count: Arc<AtomicUsize>,
}

impl ChannelTransport {
    /// Create a connected host/device pair.
    pub fn new_pair() -> (ChannelTransport, DevicePeer) {
        let (host_tx, device_rx) = unbounded();
        let (device_tx, host_rx) = unbounded();
        let close_count = Arc::new(AtomicUsize::new(0));

        let host = ChannelTransport {
            to_device: host_tx,
            from_device: host_rx,
            close_count: close_count.clone(),
            closed: false,
        };
        let device = DevicePeer {
            from_host: device_rx,
            to_host: device_tx,
            close_count,
        };
        (host, device)
    }
}

impl Transport for ChannelTransport {
    fn write_byte(&mut self, byte: u8) -> Result<(), TransportError> {
        if self.closed {
            return Err(TransportError::Closed);
        }
        self.to_device.send(byte).map_err(|_| TransportError::Closed)
    }

    fn read_byte(&mut self, deadline: Option<Instant>) -> Result<u8, TransportError> {
        if self.closed {
            return Err(TransportError::Closed);
        }
        match deadline {
            None => self.from_device.recv().map_err(|_| TransportError::Closed),
            Some(deadline) => self.from_device.recv_deadline(deadline).map_err(|e| match e {
                RecvTimeoutError::Timeout => TransportError::TimedOut,
                RecvTimeoutError::Disconnected => TransportError::Closed,
            }),
        }
    }

    fn discard_input(&mut self) -> Result<(), TransportError> {
        while self.from_device.try_recv().is_ok() {}
        Ok(())
    }

    fn close(&mut self) -> Result<(), TransportError> {
        if !self.closed {
            self.closed = true;
            self.close_count.fetch_add(1, Ordering::SeqCst);
        }
        Ok(())
    }
}

impl DevicePeer {
    /// Queue bytes for the host to read.
    pub fn send(&self, data: &[u8]) {
        for &byte in data {
            // The host end may already be gone; nothing to deliver to then.
            let _ = self.to_host.send(byte);
        }
    }

    /// Take every byte the host has written so far.
    pub fn received(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        loop {
            match self.from_host.try_recv() {
                Ok(byte) => bytes.push(byte),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        bytes
    }

    /// Wait up to `timeout` for the host to write one byte.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<u8> {
        self.from_host.recv_timeout(timeout).ok()
    }

    /// How many times the host end has been closed.
    pub fn close_count(&self) -> usize {
        self.close_count.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bytes_flow_both_ways() {
        let (mut host, device) = ChannelTransport::new_pair();

        host.write_byte(b'g').unwrap();
        host.write_byte(b'G').unwrap();
        assert_eq!(device.received(), vec![b'g', b'G']);

        device.send(b"ok");
        assert_eq!(host.read_byte(None).unwrap(), b'o');
        assert_eq!(host.read_byte(None).unwrap(), b'k');
    }

    #[test]
    fn test_read_deadline() {
        let (mut host, _device) = ChannelTransport::new_pair();
        let deadline = Instant::now() + Duration::from_millis(20);

        assert!(matches!(
            host.read_byte(Some(deadline)),
            Err(TransportError::TimedOut)
        ));
    }

    #[test]
    fn test_discard_input() {
        let (mut host, device) = ChannelTransport::new_pair();
        device.send(b"stale");
        host.discard_input().unwrap();

        device.send(b"x");
        assert_eq!(host.read_byte(None).unwrap(), b'x');
    }

    #[test]
    fn test_close_is_counted_once() {
        let (mut host, device) = ChannelTransport::new_pair();
        host.close().unwrap();
        host.close().unwrap();

        assert_eq!(device.close_count(), 1);
        assert!(matches!(host.write_byte(b'g'), Err(TransportError::Closed)));
    }
}
