//! Accepted connections, whichever socket family they arrived on.

use std::io::{self, Read, Write};
use std::net::TcpStream;
use std::time::Duration;

#[cfg(unix)]
use std::os::unix::net::UnixStream;

/// A connection accepted by the listener.
pub(crate) enum ConnectionStream {
    Tcp(TcpStream),
    #[cfg(unix)]
    Unix(UnixStream),
}

/// Runs `$body` against the inner stream of either family.
macro_rules! on_stream {
    ($connection:expr, $stream:ident => $body:expr) => {
        match $connection {
            ConnectionStream::Tcp($stream) => $body,
            #[cfg(unix)]
            ConnectionStream::Unix($stream) => $body,
        }
    };
}

impl ConnectionStream {
    /// Bounds how long a single read or write may block.
    pub(crate) fn set_io_timeout(&self, timeout: Option<Duration>) -> io::Result<()> {
        on_stream!(self, stream => {
            stream.set_read_timeout(timeout)?;
            stream.set_write_timeout(timeout)
        })
    }

    /// Peer description for log fields.
    pub(crate) fn peer(&self) -> String {
        match self {
            Self::Tcp(stream) => stream
                .peer_addr()
                .map_or_else(|_| String::from("tcp:unknown"), |addr| format!("tcp:{addr}")),
            #[cfg(unix)]
            Self::Unix(_) => String::from("unix"),
        }
    }
}

impl Read for ConnectionStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        on_stream!(self, stream => stream.read(buf))
    }
}

impl Write for ConnectionStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        on_stream!(self, stream => stream.write(buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        on_stream!(self, stream => stream.flush())
    }
}

/// Serves connections handed over by the accept loop.
///
/// Each call runs on its own thread; a panic would only lose that connection,
/// but implementations report failures to the peer instead.
pub(crate) trait ConnectionHandler: Send + Sync + 'static {
    fn handle(&self, stream: ConnectionStream);
}
