//! Byte transports for the remote command link

use crate::error::{Error, Result};
use std::io::ErrorKind;

/// Consecutive writes that may accept nothing before `write_all` gives up
pub const MAX_STALLED_WRITES: usize = 16;

mod mock;
mod serial;

pub use mock::MockTransport;
pub use serial::SerialTransport;

/// Bidirectional byte stream
pub trait Transport: Send {
    /// Read available bytes into `buffer`. Returns 0 when nothing arrived.
    fn read(&mut self, buffer: &mut [u8]) -> Result<usize>;

    /// Write `data`, returning the number of bytes accepted
    fn write(&mut self, data: &[u8]) -> Result<usize>;

    /// Block until pending writes are sent
    fn flush(&mut self) -> Result<()>;

    /// Bytes waiting to be read
    fn available(&mut self) -> Result<usize> {
        Ok(0)
    }

    /// Write every byte of `data`, retrying short writes and write timeouts.
    ///
    /// Fails with `ErrorKind::WriteZero` after [`MAX_STALLED_WRITES`]
    /// consecutive attempts that accept nothing.
    fn write_all(&mut self, mut data: &[u8]) -> Result<()> {
        let mut stalled = 0;
        while !data.is_empty() {
            let written = match self.write(data) {
                Ok(n) => n,
                Err(Error::Io(e)) if e.kind() == ErrorKind::TimedOut => 0,
                Err(e) => return Err(e),
            };
            if written == 0 {
                stalled += 1;
                if stalled >= MAX_STALLED_WRITES {
                    return Err(Error::Io(std::io::Error::new(
                        ErrorKind::WriteZero,
                        format!("transport accepted nothing after {} attempts", stalled),
                    )));
                }
                continue;
            }
            stalled = 0;
            data = &data[written.min(data.len())..];
        }
        Ok(())
    }
}

/// True for write failures the link can survive: timeouts and a transport
/// that keeps accepting nothing
pub fn is_transient(error: &Error) -> bool {
    matches!(
        error,
        Error::Io(e) if matches!(e.kind(), ErrorKind::TimedOut | ErrorKind::WriteZero)
    )
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn read(&mut self, buffer: &mut [u8]) -> Result<usize> {
        (**self).read(buffer)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize> {
        (**self).write(data)
    }

    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }

    fn available(&mut self) -> Result<usize> {
        (**self).available()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Accepts nothing for the first `refusals` writes, then one byte at a time
    struct Sluggish {
        refusals: usize,
        written: Vec<u8>,
    }

    impl Transport for Sluggish {
        fn read(&mut self, _buffer: &mut [u8]) -> Result<usize> {
            Ok(0)
        }

        fn write(&mut self, data: &[u8]) -> Result<usize> {
            if self.refusals > 0 {
                self.refusals -= 1;
                if self.refusals % 2 == 0 {
                    return Err(Error::Io(std::io::Error::from(ErrorKind::TimedOut)));
                }
                return Ok(0);
            }
            self.written.push(data[0]);
            Ok(1)
        }

        fn flush(&mut self) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_all_retries_short_writes_and_timeouts() {
        let mut transport = Sluggish {
            refusals: 3,
            written: Vec::new(),
        };
        transport.write_all(b"824").unwrap();
        assert_eq!(transport.written, b"824");
    }

    #[test]
    fn test_write_all_gives_up_on_dead_transport() {
        let mut transport = Sluggish {
            refusals: usize::MAX,
            written: Vec::new(),
        };
        let err = transport.write_all(b"8").unwrap_err();
        assert!(is_transient(&err), "{}", err);
        assert!(transport.written.is_empty());
    }

    #[test]
    fn test_other_errors_are_fatal() {
        assert!(!is_transient(&Error::Device("gone".to_string())));
        assert!(!is_transient(&Error::Io(std::io::Error::from(
            ErrorKind::BrokenPipe
        ))));
    }
}
