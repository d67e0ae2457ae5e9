//! Tests for the socket listener.

use std::net::TcpStream;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use rstest::{fixture, rstest};

use deckbridge_config::SocketEndpoint;

use super::listener::SocketListener;
use super::{ConnectionHandler, ConnectionStream, ListenerError};

/// Remembers the peer of every connection the accept loop hands over.
#[derive(Default)]
struct PeerRecorder {
    peers: Mutex<Vec<String>>,
}

impl PeerRecorder {
    fn peers(&self) -> Vec<String> {
        self.peers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn wait_for(&self, expected: usize) -> Vec<String> {
        let deadline = Instant::now() + Duration::from_secs(2);
        while Instant::now() < deadline {
            let peers = self.peers();
            if peers.len() >= expected {
                return peers;
            }
            std::thread::sleep(Duration::from_millis(10));
        }
        self.peers()
    }
}

impl ConnectionHandler for PeerRecorder {
    fn handle(&self, stream: ConnectionStream) {
        let peer = stream.peer();
        self.peers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(peer);
    }
}

fn start(listener: SocketListener) -> (Arc<PeerRecorder>, super::ListenerHandle) {
    let recorder = Arc::new(PeerRecorder::default());
    let handler: Arc<dyn ConnectionHandler> = Arc::<PeerRecorder>::clone(&recorder);
    let handle = listener.start(handler).expect("start listener");
    (recorder, handle)
}

#[fixture]
fn tcp_endpoint() -> SocketEndpoint {
    SocketEndpoint::tcp("127.0.0.1", 0)
}

#[rstest]
fn tcp_listener_hands_each_connection_to_the_handler(tcp_endpoint: SocketEndpoint) {
    let listener = SocketListener::bind(&tcp_endpoint).expect("bind tcp listener");
    let addr = listener.local_addr().expect("tcp listener reports its address");
    let (recorder, handle) = start(listener);

    let first = TcpStream::connect(addr).expect("connect first client");
    let second = TcpStream::connect(addr).expect("connect second client");

    let mut peers = recorder.wait_for(2);
    peers.sort();
    let mut expected = [&first, &second]
        .map(|client| format!("tcp:{}", client.local_addr().expect("client addr")));
    expected.sort();
    assert_eq!(peers, expected);
    assert_eq!(handle.endpoint(), &tcp_endpoint);
    handle.shutdown();
    handle.join().expect("join listener");
}

#[cfg(unix)]
#[fixture]
fn unix_tempdir() -> tempfile::TempDir {
    tempfile::tempdir().expect("temp dir")
}

#[cfg(unix)]
#[rstest]
fn unix_listener_replaces_stale_socket_and_removes_it_on_shutdown(
    unix_tempdir: tempfile::TempDir,
) {
    let path = unix_tempdir.path().join("deckbridged.sock");
    {
        let _stale = std::os::unix::net::UnixListener::bind(&path).expect("bind stale listener");
    }
    assert!(path.exists(), "stale socket should remain");

    let endpoint = SocketEndpoint::unix(path.to_str().expect("utf8 path"));
    let listener = SocketListener::bind(&endpoint).expect("bind over stale socket");
    assert!(listener.local_addr().is_none());
    let (recorder, handle) = start(listener);

    let _client = std::os::unix::net::UnixStream::connect(&path).expect("connect unix client");
    assert_eq!(recorder.wait_for(1), ["unix"]);

    handle.shutdown();
    handle.join().expect("join listener");
    assert!(!path.exists(), "listener should remove its socket on shutdown");
}

#[cfg(unix)]
#[rstest]
fn unix_listener_refuses_a_live_socket(unix_tempdir: tempfile::TempDir) {
    let path = unix_tempdir.path().join("deckbridged.sock");
    let _live = std::os::unix::net::UnixListener::bind(&path).expect("bind live listener");

    let endpoint = SocketEndpoint::unix(path.to_str().expect("utf8 path"));
    let error = SocketListener::bind(&endpoint).expect_err("socket is in use");
    assert!(matches!(error, ListenerError::UnixInUse { .. }));
}

#[cfg(unix)]
#[rstest]
fn unix_listener_refuses_regular_files(unix_tempdir: tempfile::TempDir) {
    let path = unix_tempdir.path().join("deckbridged.sock");
    std::fs::write(&path, b"not a socket").expect("write regular file");

    let endpoint = SocketEndpoint::unix(path.to_str().expect("utf8 path"));
    let error = SocketListener::bind(&endpoint).expect_err("path is not a socket");
    assert!(matches!(error, ListenerError::UnixNotSocket { .. }));
}
