//! Runs the daemon from bootstrap to shutdown.

use std::sync::Arc;

use tracing::info;

use deckbridge_jsapi::Speech;

use crate::bootstrap::{ConfigLoader, SystemConfigLoader, bootstrap_with};
use crate::dispatch::DispatchConnectionHandler;
use crate::health::{HealthReporter, StructuredHealthReporter};
use crate::speech::TracingSpeech;
use crate::transport::SocketListener;

use super::PROCESS_TARGET;
use super::errors::LaunchError;
use super::shutdown::{ShutdownSignal, SystemShutdownSignal};

/// Runs the daemon with the production collaborators until a termination
/// signal arrives.
///
/// # Errors
///
/// Returns [`LaunchError`] when bootstrap, binding, or signal handling fails.
pub fn run_daemon() -> Result<(), LaunchError> {
    run_daemon_with(
        &SystemConfigLoader,
        Arc::new(StructuredHealthReporter::new()),
        Arc::new(TracingSpeech::new()),
        &SystemShutdownSignal,
    )
}

/// Runs the daemon with injected collaborators.
pub(crate) fn run_daemon_with(
    loader: &dyn ConfigLoader,
    reporter: Arc<dyn HealthReporter>,
    speech: Arc<dyn Speech>,
    shutdown: &dyn ShutdownSignal,
) -> Result<(), LaunchError> {
    let daemon = bootstrap_with(loader, reporter, speech)?;
    let health = daemon.reporter();
    let listener = SocketListener::bind(daemon.config().daemon_socket())?;
    let handler = Arc::new(DispatchConnectionHandler::new(daemon.api()));
    let handle = listener.start(handler)?;
    health.listener_ready(handle.endpoint());

    shutdown.wait()?;

    let endpoint = handle.endpoint().clone();
    handle.shutdown();
    handle.join()?;
    health.listener_stopped(&endpoint);
    info!(target: PROCESS_TARGET, "shutdown sequence completed");
    Ok(())
}
