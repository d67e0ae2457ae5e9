//! Scenario worlds for the bootstrap and dispatch suites.

use std::fs;
use std::io::{BufRead, BufReader, Write};
use std::net::{SocketAddr, TcpStream};
use std::sync::Arc;
use std::time::Duration;

use camino::Utf8PathBuf;
use serde_json::Value;

use deckbridge_config::SocketEndpoint;
use deckbridge_jsapi::{CardId, JsApi};

use crate::bootstrap::{BootstrapError, ConfigLoader, Daemon, bootstrap_with};
use crate::dispatch::DispatchConnectionHandler;
use crate::speech::TracingSpeech;
use crate::transport::{ListenerHandle, SocketListener};

use super::collection::sample_api;
use super::config_loader::TestConfigLoader;
use super::reporter::RecordingHealthReporter;

/// Bootstrap inputs and outcome.
pub(crate) struct BootstrapWorld {
    loader: Box<dyn ConfigLoader>,
    pub(crate) reporter: Arc<RecordingHealthReporter>,
    outcome: Option<Result<Daemon, BootstrapError>>,
    snapshot_file: Option<(Utf8PathBuf, Vec<u8>)>,
}

impl BootstrapWorld {
    pub(crate) fn new() -> Self {
        Self {
            loader: Box::new(TestConfigLoader::new()),
            reporter: Arc::new(RecordingHealthReporter::default()),
            outcome: None,
            snapshot_file: None,
        }
    }

    /// Uses `loader` and remembers the bytes of its snapshot file.
    pub(crate) fn use_snapshot_loader(&mut self, loader: TestConfigLoader) {
        self.snapshot_file = loader.collection_path().map(|path| {
            let bytes = fs::read(path).expect("read snapshot file");
            (path.clone(), bytes)
        });
        self.use_loader(loader);
    }

    /// Snapshot path and the bytes it held before bootstrap.
    pub(crate) fn snapshot_file(&self) -> Option<&(Utf8PathBuf, Vec<u8>)> {
        self.snapshot_file.as_ref()
    }

    pub(crate) fn use_loader(&mut self, loader: impl ConfigLoader + 'static) {
        self.loader = Box::new(loader);
        self.outcome = None;
    }

    pub(crate) fn bootstrap(&mut self) {
        let reporter = Arc::clone(&self.reporter);
        self.outcome = Some(bootstrap_with(
            self.loader.as_ref(),
            reporter,
            Arc::new(TracingSpeech::new()),
        ));
    }

    pub(crate) fn daemon(&self) -> Option<&Daemon> {
        self.outcome.as_ref().and_then(|outcome| outcome.as_ref().ok())
    }

    pub(crate) fn error(&self) -> Option<&BootstrapError> {
        self.outcome.as_ref().and_then(|outcome| outcome.as_ref().err())
    }

    /// Calls the bootstrapped dispatcher directly.
    pub(crate) fn call(&self, path: &str, body: &str, current_card: i64) -> Option<Value> {
        let api: Arc<JsApi> = self.daemon()?.api();
        let response = api
            .handle(path, body.as_bytes(), CardId(current_card))
            .expect("dispatch succeeds")?;
        Some(serde_json::from_slice(&response.encode().expect("encode")).expect("json envelope"))
    }
}

/// A listener serving the sample collection over TCP.
pub(crate) struct DispatchWorld {
    listener: Option<ListenerHandle>,
    address: Option<SocketAddr>,
    pub(crate) replies: Vec<Value>,
}

impl DispatchWorld {
    pub(crate) const fn new() -> Self {
        Self {
            listener: None,
            address: None,
            replies: Vec::new(),
        }
    }

    pub(crate) fn start_listener(&mut self) {
        let listener =
            SocketListener::bind(&SocketEndpoint::tcp("127.0.0.1", 0)).expect("bind listener");
        self.address = listener.local_addr();
        let handler = Arc::new(DispatchConnectionHandler::new(sample_api()));
        self.listener = Some(listener.start(handler).expect("start listener"));
    }

    pub(crate) fn send_line(&mut self, line: &str) {
        let addr = self.address.expect("listener started");
        let mut stream = TcpStream::connect(addr).expect("connect");
        stream
            .set_read_timeout(Some(Duration::from_secs(2)))
            .expect("set read timeout");
        stream.write_all(line.as_bytes()).expect("write request");
        stream.write_all(b"\n").expect("write newline");
        stream.flush().expect("flush");

        let mut reader = BufReader::new(stream);
        let mut reply = String::new();
        while reader.read_line(&mut reply).expect("read reply") > 0 {
            self.replies
                .push(serde_json::from_str(reply.trim()).expect("json reply"));
            reply.clear();
        }
    }

    /// The only reply received so far.
    pub(crate) fn reply(&self) -> &Value {
        assert_eq!(self.replies.len(), 1, "replies: {:?}", self.replies);
        self.replies.first().expect("one reply")
    }
}

impl Drop for DispatchWorld {
    fn drop(&mut self) {
        if let Some(handle) = self.listener.take() {
            handle.shutdown();
            if let Err(error) = handle.join() {
                tracing::warn!(%error, "listener did not stop cleanly");
            }
        }
    }
}
