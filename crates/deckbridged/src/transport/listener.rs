//! Accept loop for the daemon socket.

use std::io;
use std::net::{SocketAddr, TcpListener, ToSocketAddrs};
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use std::thread;
use std::time::Duration;

use tracing::{debug, info, warn};

use deckbridge_config::SocketEndpoint;

use super::{ConnectionHandler, ConnectionStream, LISTENER_TARGET, ListenerError};

#[cfg(unix)]
use std::fs;
#[cfg(unix)]
use std::os::unix::fs::FileTypeExt;
#[cfg(unix)]
use std::os::unix::net::{UnixListener, UnixStream};
#[cfg(unix)]
use std::path::Path;

const ACCEPT_BACKOFF: Duration = Duration::from_millis(25);
const ERROR_BACKOFF: Duration = Duration::from_millis(150);

/// A bound, not yet accepting, daemon socket.
#[derive(Debug)]
pub(crate) struct SocketListener {
    endpoint: SocketEndpoint,
    listener: ListenerKind,
}

#[derive(Debug)]
enum ListenerKind {
    Tcp(TcpListener),
    #[cfg(unix)]
    Unix(UnixListener),
}

impl SocketListener {
    pub(crate) fn bind(endpoint: &SocketEndpoint) -> Result<Self, ListenerError> {
        let listener = match endpoint {
            SocketEndpoint::Tcp { host, port } => ListenerKind::Tcp(bind_tcp(host, *port)?),
            #[cfg(unix)]
            SocketEndpoint::Unix { path } => ListenerKind::Unix(bind_unix(path.as_std_path())?),
            #[cfg(not(unix))]
            SocketEndpoint::Unix { .. } => {
                return Err(ListenerError::UnsupportedUnix {
                    endpoint: endpoint.to_string(),
                });
            }
        };
        Ok(Self {
            endpoint: endpoint.clone(),
            listener,
        })
    }

    /// Bound TCP address; `None` for Unix sockets.
    pub(crate) fn local_addr(&self) -> Option<SocketAddr> {
        match &self.listener {
            ListenerKind::Tcp(listener) => listener.local_addr().ok(),
            #[cfg(unix)]
            ListenerKind::Unix(_) => None,
        }
    }

    /// Spawns the accept loop.
    pub(crate) fn start(
        self,
        handler: Arc<dyn ConnectionHandler>,
    ) -> Result<ListenerHandle, ListenerError> {
        let nonblocking = match &self.listener {
            ListenerKind::Tcp(listener) => listener.set_nonblocking(true),
            #[cfg(unix)]
            ListenerKind::Unix(listener) => listener.set_nonblocking(true),
        };
        if let Err(source) = nonblocking {
            #[cfg(unix)]
            cleanup_unix_socket(&self.endpoint);
            return Err(ListenerError::NonBlocking { source });
        }
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_flag = Arc::clone(&shutdown);
        let endpoint = self.endpoint.clone();
        let handle = thread::spawn(move || run_accept_loop(&self, &shutdown_flag, &handler));
        Ok(ListenerHandle {
            endpoint,
            shutdown,
            handle: Some(handle),
        })
    }
}

/// Handle to the background accept thread.
pub(crate) struct ListenerHandle {
    endpoint: SocketEndpoint,
    shutdown: Arc<AtomicBool>,
    handle: Option<thread::JoinHandle<()>>,
}

impl ListenerHandle {
    pub(crate) const fn endpoint(&self) -> &SocketEndpoint {
        &self.endpoint
    }

    /// Asks the accept loop to stop after its current poll.
    pub(crate) fn shutdown(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
    }

    pub(crate) fn join(mut self) -> Result<(), ListenerError> {
        match self.handle.take() {
            Some(handle) => handle.join().map_err(|_| ListenerError::ThreadPanic),
            None => Ok(()),
        }
    }
}

impl Drop for ListenerHandle {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::SeqCst);
    }
}

fn run_accept_loop(
    listener: &SocketListener,
    shutdown: &AtomicBool,
    handler: &Arc<dyn ConnectionHandler>,
) {
    info!(
        target: LISTENER_TARGET,
        endpoint = %listener.endpoint,
        "socket listener active"
    );
    let mut last_error = None::<io::ErrorKind>;
    while !shutdown.load(Ordering::SeqCst) {
        match accept_connection(listener) {
            Ok(Some(stream)) => {
                last_error = None;
                let connection_handler = Arc::clone(handler);
                thread::spawn(move || connection_handler.handle(stream));
            }
            Ok(None) => thread::sleep(ACCEPT_BACKOFF),
            Err(error) => {
                let kind = error.kind();
                if last_error != Some(kind) {
                    warn!(
                        target: LISTENER_TARGET,
                        error = %error,
                        "socket accept error"
                    );
                }
                last_error = Some(kind);
                thread::sleep(ERROR_BACKOFF);
            }
        }
    }
    debug!(target: LISTENER_TARGET, endpoint = %listener.endpoint, "accept loop stopped");

    #[cfg(unix)]
    cleanup_unix_socket(&listener.endpoint);
}

fn accept_connection(listener: &SocketListener) -> io::Result<Option<ConnectionStream>> {
    let accepted = match &listener.listener {
        ListenerKind::Tcp(tcp) => tcp.accept().and_then(|(stream, _)| {
            stream.set_nonblocking(false)?;
            Ok(ConnectionStream::Tcp(stream))
        }),
        #[cfg(unix)]
        ListenerKind::Unix(unix) => unix.accept().and_then(|(stream, _)| {
            stream.set_nonblocking(false)?;
            Ok(ConnectionStream::Unix(stream))
        }),
    };
    match accepted {
        Ok(stream) => Ok(Some(stream)),
        Err(error) if error.kind() == io::ErrorKind::WouldBlock => Ok(None),
        Err(error) => Err(error),
    }
}

fn bind_tcp(host: &str, port: u16) -> Result<TcpListener, ListenerError> {
    let addr = (host, port)
        .to_socket_addrs()
        .map_err(|source| ListenerError::Resolve {
            host: host.to_owned(),
            port,
            source,
        })?
        .next()
        .ok_or_else(|| ListenerError::ResolveEmpty {
            host: host.to_owned(),
            port,
        })?;
    TcpListener::bind(addr).map_err(|source| ListenerError::BindTcp { addr, source })
}

#[cfg(unix)]
fn bind_unix(path: &Path) -> Result<UnixListener, ListenerError> {
    let display = || path.display().to_string();
    if path.exists() {
        let metadata = fs::symlink_metadata(path).map_err(|source| ListenerError::UnixMetadata {
            path: display(),
            source,
        })?;
        if !metadata.file_type().is_socket() {
            return Err(ListenerError::UnixNotSocket { path: display() });
        }
        // A live peer answers; a stale file refuses the connection.
        match UnixStream::connect(path) {
            Ok(_peer) => return Err(ListenerError::UnixInUse { path: display() }),
            Err(error)
                if matches!(
                    error.kind(),
                    io::ErrorKind::ConnectionRefused | io::ErrorKind::NotFound
                ) =>
            {
                fs::remove_file(path).map_err(|source| ListenerError::UnixCleanup {
                    path: display(),
                    source,
                })?;
            }
            Err(source) => {
                return Err(ListenerError::UnixConnect {
                    path: display(),
                    source,
                });
            }
        }
    }

    UnixListener::bind(path).map_err(|source| ListenerError::BindUnix {
        path: display(),
        source,
    })
}

#[cfg(unix)]
fn cleanup_unix_socket(endpoint: &SocketEndpoint) {
    let Some(path) = endpoint.unix_path() else {
        return;
    };
    if let Err(error) = fs::remove_file(path.as_std_path())
        && error.kind() != io::ErrorKind::NotFound
    {
        warn!(
            target: LISTENER_TARGET,
            error = %error,
            path = %path,
            "failed to remove unix socket file"
        );
    }
}
