//! Serial link servicing

use crate::error::Result;
use crate::navigation::Navigator;
use crate::transport::Transport;

/// Reads command bytes from a transport, echoes them and hands them to the
/// navigator.
///
/// Bytes are taken one at a time, so anything that arrives while a command
/// runs stays queued in the transport and is handled after it finishes. A
/// byte whose echo cannot be written is not executed.
pub struct RemoteLink<T: Transport> {
    transport: T,
}

impl<T: Transport> RemoteLink<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Service every byte currently queued. Returns how many were handled.
    pub fn poll(&mut self, navigator: &mut Navigator) -> Result<usize> {
        let mut handled = 0;
        let mut byte = [0u8; 1];
        while self.transport.read(&mut byte)? == 1 {
            self.transport.write_all(&byte)?;
            self.transport.flush()?;
            handled += 1;
            navigator.handle_byte(byte[0])?;
        }
        Ok(handled)
    }
}
