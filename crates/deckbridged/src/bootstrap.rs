//! Daemon bootstrap orchestration.

use std::fs;
use std::io;
use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use ortho_config::{OrthoConfig, OrthoError};
use thiserror::Error;

use deckbridge_config::{Config, SocketPreparationError};
use deckbridge_jsapi::collection::{CollectionSnapshot, MemoryCollection};
use deckbridge_jsapi::{CollectionManager, ContractMessages, JsApi, Speech};

use crate::health::HealthReporter;
use crate::telemetry::{self, TelemetryError, TelemetryHandle};

/// Configuration source, abstracted for tests.
pub trait ConfigLoader: Send + Sync {
    /// Loads the daemon configuration.
    ///
    /// # Errors
    ///
    /// Returns the layered loader's error.
    fn load(&self) -> Result<Config, Arc<OrthoError>>;
}

/// Loader that delegates to [`Config::load`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemConfigLoader;

impl ConfigLoader for SystemConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        Config::load()
    }
}

/// Loader that hands out an already resolved configuration.
#[derive(Debug, Clone)]
pub struct StaticConfigLoader {
    config: Config,
}

impl StaticConfigLoader {
    /// Wraps `config`.
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config }
    }
}

impl ConfigLoader for StaticConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        Ok(self.config.clone())
    }
}

/// Errors surfaced during bootstrap.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// Configuration failed to load.
    #[error("failed to load configuration: {source}")]
    Configuration {
        /// Underlying loader error.
        #[source]
        source: Arc<OrthoError>,
    },
    /// Telemetry initialisation failed.
    #[error("failed to initialise telemetry: {source}")]
    Telemetry {
        /// Underlying telemetry error.
        #[source]
        source: TelemetryError,
    },
    /// Socket preparation failed.
    #[error("failed to prepare daemon socket: {source}")]
    Socket {
        /// Filesystem error reported while preparing the socket directory.
        #[source]
        source: SocketPreparationError,
    },
    /// The collection snapshot could not be read.
    #[error("failed to read collection snapshot '{path}': {source}")]
    CollectionRead {
        /// Configured snapshot path.
        path: Utf8PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
    /// The collection snapshot is not valid JSON for a collection.
    #[error("failed to parse collection snapshot '{path}': {source}")]
    CollectionParse {
        /// Configured snapshot path.
        path: Utf8PathBuf,
        /// Underlying decoding error.
        #[source]
        source: serde_json::Error,
    },
}

/// Result of a successful bootstrap.
pub struct Daemon {
    config: Config,
    api: Arc<JsApi>,
    telemetry: TelemetryHandle,
    reporter: Arc<dyn HealthReporter>,
}

impl Daemon {
    /// Resolved configuration.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Dispatcher shared by every connection.
    #[must_use]
    pub fn api(&self) -> Arc<JsApi> {
        Arc::clone(&self.api)
    }

    /// Telemetry handle, primarily useful for testing.
    #[must_use]
    pub const fn telemetry(&self) -> TelemetryHandle {
        self.telemetry
    }

    /// Reporter that observed the bootstrap.
    #[must_use]
    pub fn reporter(&self) -> Arc<dyn HealthReporter> {
        Arc::clone(&self.reporter)
    }
}

impl std::fmt::Debug for Daemon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Daemon")
            .field("config", &self.config)
            .field("api", &self.api)
            .finish_non_exhaustive()
    }
}

/// Bootstraps the daemon using the supplied collaborators.
///
/// Stages run in order: configuration, telemetry, socket directory, collection
/// snapshot. The first failure is reported and returned.
///
/// # Errors
///
/// Returns the [`BootstrapError`] of the failing stage.
pub fn bootstrap_with(
    loader: &dyn ConfigLoader,
    reporter: Arc<dyn HealthReporter>,
    speech: Arc<dyn Speech>,
) -> Result<Daemon, BootstrapError> {
    reporter.bootstrap_starting();
    match build(loader, reporter.as_ref(), speech) {
        Ok((config, api, telemetry)) => {
            reporter.bootstrap_succeeded(&config);
            Ok(Daemon {
                config,
                api,
                telemetry,
                reporter,
            })
        }
        Err(error) => {
            reporter.bootstrap_failed(&error);
            Err(error)
        }
    }
}

fn build(
    loader: &dyn ConfigLoader,
    reporter: &dyn HealthReporter,
    speech: Arc<dyn Speech>,
) -> Result<(Config, Arc<JsApi>, TelemetryHandle), BootstrapError> {
    let config = loader
        .load()
        .map_err(|source| BootstrapError::Configuration { source })?;
    let telemetry =
        telemetry::initialise(&config).map_err(|source| BootstrapError::Telemetry { source })?;
    config
        .daemon_socket()
        .prepare_filesystem()
        .map_err(|source| BootstrapError::Socket { source })?;

    let snapshot = match config.collection_path() {
        Some(path) => read_snapshot(path)?,
        None => CollectionSnapshot::default(),
    };
    reporter.collection_loaded(config.collection_path(), snapshot.cards.len());

    let collection = CollectionManager::new(MemoryCollection::from_snapshot(snapshot));
    let api = JsApi::new(collection, speech, ContractMessages::load());
    Ok((config, Arc::new(api), telemetry))
}

/// Reads a collection snapshot from disk.
///
/// The daemon serves the snapshot from memory and leaves the file untouched.
///
/// # Errors
///
/// Returns [`BootstrapError::CollectionRead`] or
/// [`BootstrapError::CollectionParse`].
pub fn read_snapshot(path: &Utf8Path) -> Result<CollectionSnapshot, BootstrapError> {
    let bytes = fs::read(path).map_err(|source| BootstrapError::CollectionRead {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&bytes).map_err(|source| BootstrapError::CollectionParse {
        path: path.to_path_buf(),
        source,
    })
}
