use std::io;

use signal_hook::consts::signal::{SIGHUP, SIGINT, SIGQUIT, SIGTERM};
use signal_hook::iterator::Signals;
use thiserror::Error;
use tracing::info;

use super::PROCESS_TARGET;

/// Blocks until the daemon should stop.
pub trait ShutdownSignal: Send + Sync {
    /// Returns once shutdown should proceed.
    ///
    /// # Errors
    ///
    /// Returns [`ShutdownError`] when the notification source cannot be set up.
    fn wait(&self) -> Result<(), ShutdownError>;
}

/// Errors reported by shutdown listeners.
#[derive(Debug, Error)]
pub enum ShutdownError {
    /// Installing signal handlers failed.
    #[error("failed to install signal handlers: {source}")]
    Install {
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
}

/// Waits for SIGTERM, SIGINT, SIGQUIT, or SIGHUP.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemShutdownSignal;

impl ShutdownSignal for SystemShutdownSignal {
    fn wait(&self) -> Result<(), ShutdownError> {
        let mut signals = Signals::new([SIGTERM, SIGINT, SIGQUIT, SIGHUP])
            .map_err(|source| ShutdownError::Install { source })?;
        if let Some(signal) = signals.forever().next() {
            info!(target: PROCESS_TARGET, signal, "shutdown signal received");
        }
        Ok(())
    }
}
