//! In-memory transport for tests and the simulator

use super::Transport;
use crate::error::Result;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

/// Cloneable loopback: one handle feeds bytes in, another drives the link
#[derive(Clone, Default)]
pub struct MockTransport {
    inner: Arc<Mutex<MockTransportInner>>,
}

#[derive(Default)]
struct MockTransportInner {
    incoming: VecDeque<u8>,
    outgoing: Vec<u8>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue bytes as if sent by the remote side
    pub fn inject(&self, data: &[u8]) {
        self.inner.lock().incoming.extend(data);
    }

    /// Everything written so far
    pub fn written(&self) -> Vec<u8> {
        self.inner.lock().outgoing.clone()
    }

    pub fn clear_written(&self) {
        self.inner.lock().outgoing.clear();
    }
}

impl Transport for MockTransport {
    fn read(&mut self, buffer: &mut [u8]) -> Result<usize> {
        let mut inner = self.inner.lock();
        let count = inner.incoming.len().min(buffer.len());
        for (slot, byte) in buffer.iter_mut().zip(inner.incoming.drain(..count)) {
            *slot = byte;
        }
        Ok(count)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize> {
        self.inner.lock().outgoing.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn available(&mut self) -> Result<usize> {
        Ok(self.inner.lock().incoming.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inject_then_read_in_order() {
        let feeder = MockTransport::new();
        let mut reader = feeder.clone();
        feeder.inject(b"842");

        let mut buf = [0u8; 2];
        assert_eq!(reader.read(&mut buf).unwrap(), 2);
        assert_eq!(&buf, b"84");
        assert_eq!(reader.available().unwrap(), 1);
        assert_eq!(reader.read(&mut buf).unwrap(), 1);
        assert_eq!(buf[0], b'2');
        assert_eq!(reader.read(&mut buf).unwrap(), 0);
    }

    #[test]
    fn test_written_bytes_are_visible_to_clones() {
        let observer = MockTransport::new();
        let mut writer = observer.clone();
        writer.write(b"7").unwrap();
        assert_eq!(observer.written(), b"7");
        observer.clear_written();
        assert!(observer.written().is_empty());
    }
}
