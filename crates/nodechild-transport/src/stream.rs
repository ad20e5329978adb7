use std::io::{Read, Write};
use std::net::Shutdown;
use std::os::fd::{FromRawFd, RawFd};
use std::os::unix::net::UnixStream;

use tracing::debug;

use crate::error::{Result, TransportError};

/// The raw bidirectional channel handle — implements Read + Write.
///
/// On Unix this wraps the socketpair endpoint Node.js created for the
/// child. The channel layer owns exactly one of these for its lifetime;
/// the underlying descriptor is closed once, when the last clone drops.
pub struct ChannelStream {
    inner: ChannelStreamInner,
}

enum ChannelStreamInner {
    Unix(UnixStream),
}

impl Read for ChannelStream {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        match &mut self.inner {
            ChannelStreamInner::Unix(stream) => stream.read(buf),
        }
    }
}

impl Write for ChannelStream {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match &mut self.inner {
            ChannelStreamInner::Unix(stream) => stream.write(buf),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match &mut self.inner {
            ChannelStreamInner::Unix(stream) => stream.flush(),
        }
    }
}

impl ChannelStream {
    fn from_unix(stream: UnixStream) -> Self {
        Self {
            inner: ChannelStreamInner::Unix(stream),
        }
    }

    /// Adopt an inherited descriptor as a channel stream.
    ///
    /// The descriptor is probed with `fcntl(F_GETFD)` first so a stale or
    /// never-opened number fails with [`TransportError::BadDescriptor`]
    /// instead of producing a stream that errors on first use.
    pub fn from_descriptor(fd: RawFd) -> Result<Self> {
        // SAFETY: read-only descriptor probe; fd may be invalid, in which
        // case fcntl reports EBADF without side effects.
        let flags = unsafe { libc::fcntl(fd, libc::F_GETFD) };
        if flags < 0 {
            return Err(TransportError::BadDescriptor {
                fd,
                source: std::io::Error::last_os_error(),
            });
        }

        // SAFETY: the probe above confirmed fd is open, and the caller
        // hands over ownership — nothing else closes it after this point.
        let stream = unsafe { UnixStream::from_raw_fd(fd) };
        debug!(fd, "adopted channel descriptor");
        Ok(Self::from_unix(stream))
    }

    /// Create a connected pair of channel streams.
    ///
    /// This is the in-memory stand-in for an inherited descriptor: one end
    /// plays the Node.js parent, the other the child.
    pub fn pair() -> Result<(Self, Self)> {
        let (a, b) = UnixStream::pair()?;
        Ok((Self::from_unix(a), Self::from_unix(b)))
    }

    /// Shut down both directions of the stream.
    ///
    /// A read blocked on the peer observes end-of-stream promptly after
    /// this returns.
    pub fn shutdown(&self) -> Result<()> {
        match &self.inner {
            ChannelStreamInner::Unix(stream) => {
                stream.shutdown(Shutdown::Both).map_err(Into::into)
            }
        }
    }

    /// Set read timeout on the underlying stream.
    pub fn set_read_timeout(&self, timeout: Option<std::time::Duration>) -> Result<()> {
        match &self.inner {
            ChannelStreamInner::Unix(stream) => stream.set_read_timeout(timeout).map_err(Into::into),
        }
    }

    /// Set write timeout on the underlying stream.
    pub fn set_write_timeout(&self, timeout: Option<std::time::Duration>) -> Result<()> {
        match &self.inner {
            ChannelStreamInner::Unix(stream) => {
                stream.set_write_timeout(timeout).map_err(Into::into)
            }
        }
    }

    /// Try to clone this stream (creates a new file descriptor over the
    /// same underlying socket).
    pub fn try_clone(&self) -> Result<Self> {
        match &self.inner {
            ChannelStreamInner::Unix(stream) => {
                let cloned = stream.try_clone()?;
                Ok(Self::from_unix(cloned))
            }
        }
    }
}

impl std::fmt::Debug for ChannelStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.inner {
            ChannelStreamInner::Unix(_) => f
                .debug_struct("ChannelStream")
                .field("type", &"unix")
                .finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::os::fd::IntoRawFd;

    use super::*;

    #[test]
    fn pair_roundtrips_bytes() {
        let (mut a, mut b) = ChannelStream::pair().unwrap();

        a.write_all(b"hello").unwrap();
        let mut buf = [0u8; 5];
        b.read_exact(&mut buf).unwrap();

        assert_eq!(&buf, b"hello");
    }

    #[test]
    fn from_descriptor_adopts_open_fd() {
        let (a, b) = UnixStream::pair().unwrap();
        let fd = b.into_raw_fd();

        let mut adopted = ChannelStream::from_descriptor(fd).unwrap();
        let mut sender = ChannelStream::from_unix(a);

        sender.write_all(b"fd").unwrap();
        let mut buf = [0u8; 2];
        adopted.read_exact(&mut buf).unwrap();
        assert_eq!(&buf, b"fd");
    }

    #[test]
    fn from_descriptor_rejects_closed_fd() {
        let (_a, b) = UnixStream::pair().unwrap();
        let fd = b.into_raw_fd();
        // SAFETY: fd was just detached from its owner; close it so the
        // number is known-stale for the probe below.
        unsafe { libc::close(fd) };

        let err = ChannelStream::from_descriptor(fd).unwrap_err();
        assert!(matches!(err, TransportError::BadDescriptor { .. }));
    }

    #[test]
    fn shutdown_unblocks_pending_read() {
        let (a, mut b) = ChannelStream::pair().unwrap();
        let a_control = a.try_clone().unwrap();

        let reader = std::thread::spawn(move || {
            let mut buf = [0u8; 1];
            b.read(&mut buf)
        });

        std::thread::sleep(std::time::Duration::from_millis(50));
        a_control.shutdown().unwrap();
        drop(a);

        let read = reader.join().unwrap().unwrap();
        assert_eq!(read, 0, "shutdown should surface as end-of-stream");
    }

    #[test]
    fn clone_shares_the_socket() {
        let (a, mut b) = ChannelStream::pair().unwrap();
        let mut clone = a.try_clone().unwrap();

        clone.write_all(b"x").unwrap();
        let mut buf = [0u8; 1];
        b.read_exact(&mut buf).unwrap();
        assert_eq!(&buf, b"x");
    }
}
