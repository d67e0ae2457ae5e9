//! Configuration loaders for success and failure paths.

use std::ffi::OsString;
use std::fs;
use std::sync::Arc;

use camino::Utf8PathBuf;
use ortho_config::{OrthoConfig, OrthoError};
use tempfile::TempDir;

use deckbridge_config::{Config, SocketEndpoint};
use deckbridge_jsapi::collection::CollectionSnapshot;

use crate::bootstrap::ConfigLoader;

/// Loader that places the socket, and optionally a snapshot, in a temporary
/// directory.
pub(crate) struct TestConfigLoader {
    dir: TempDir,
    collection: Option<Utf8PathBuf>,
}

impl TestConfigLoader {
    pub(crate) fn new() -> Self {
        Self {
            dir: TempDir::new().expect("create temporary directory"),
            collection: None,
        }
    }

    fn path(&self, name: &str) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(self.dir.path().join(name)).expect("utf8 temp path")
    }

    pub(crate) fn socket_path(&self) -> Utf8PathBuf {
        self.path("run").join("deckbridged.sock")
    }

    pub(crate) fn collection_path(&self) -> Option<&Utf8PathBuf> {
        self.collection.as_ref()
    }

    /// Writes `snapshot` and points the configuration at it.
    pub(crate) fn with_snapshot(mut self, snapshot: &CollectionSnapshot) -> Self {
        let path = self.path("collection.json");
        fs::write(&path, serde_json::to_vec(snapshot).expect("encode snapshot"))
            .expect("write snapshot");
        self.collection = Some(path);
        self
    }

    /// Writes bytes that are not a snapshot and points the configuration at them.
    pub(crate) fn with_corrupt_snapshot(mut self) -> Self {
        let path = self.path("collection.json");
        fs::write(&path, b"{\"cards\": 42}").expect("write corrupt snapshot");
        self.collection = Some(path);
        self
    }
}

impl ConfigLoader for TestConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        Ok(Config {
            daemon_socket: SocketEndpoint::unix(self.socket_path()),
            collection_path: self.collection.clone(),
            ..Config::default()
        })
    }
}

/// Loader that fails by passing an invalid socket on the command line.
pub(crate) struct FailingConfigLoader;

impl ConfigLoader for FailingConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        let args = vec![
            OsString::from("deckbridged"),
            OsString::from("--daemon-socket"),
            OsString::from("invalid://socket"),
        ];
        Config::load_from_iter(args)
    }
}
