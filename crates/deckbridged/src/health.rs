//! Structured health reporting for daemon lifecycle events.

use std::sync::Arc;

use camino::Utf8Path;

use deckbridge_config::{Config, SocketEndpoint};

use crate::bootstrap::BootstrapError;

const HEALTH_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::health");

/// Observer used to surface lifecycle events to telemetry sinks.
pub trait HealthReporter: Send + Sync {
    /// Invoked before configuration loading begins.
    fn bootstrap_starting(&self);

    /// Invoked once the collection has been loaded. `source` is `None` for an
    /// empty collection.
    fn collection_loaded(&self, source: Option<&Utf8Path>, cards: usize);

    /// Invoked after bootstrap completes successfully.
    fn bootstrap_succeeded(&self, config: &Config);

    /// Invoked when bootstrap fails.
    fn bootstrap_failed(&self, error: &BootstrapError);

    /// Invoked when the listener accepts connections.
    fn listener_ready(&self, endpoint: &SocketEndpoint);

    /// Invoked after the listener has stopped.
    fn listener_stopped(&self, endpoint: &SocketEndpoint);
}

impl<T> HealthReporter for Arc<T>
where
    T: HealthReporter,
{
    fn bootstrap_starting(&self) {
        (**self).bootstrap_starting();
    }

    fn collection_loaded(&self, source: Option<&Utf8Path>, cards: usize) {
        (**self).collection_loaded(source, cards);
    }

    fn bootstrap_succeeded(&self, config: &Config) {
        (**self).bootstrap_succeeded(config);
    }

    fn bootstrap_failed(&self, error: &BootstrapError) {
        (**self).bootstrap_failed(error);
    }

    fn listener_ready(&self, endpoint: &SocketEndpoint) {
        (**self).listener_ready(endpoint);
    }

    fn listener_stopped(&self, endpoint: &SocketEndpoint) {
        (**self).listener_stopped(endpoint);
    }
}

/// Default reporter that records lifecycle events using `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct StructuredHealthReporter;

impl StructuredHealthReporter {
    /// Builds a new reporter.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl HealthReporter for StructuredHealthReporter {
    fn bootstrap_starting(&self) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "bootstrap_starting",
            "starting daemon bootstrap"
        );
    }

    fn collection_loaded(&self, source: Option<&Utf8Path>, cards: usize) {
        match source {
            Some(path) => tracing::info!(
                target: HEALTH_TARGET,
                event = "collection_loaded",
                path = %path,
                cards,
                "collection snapshot loaded"
            ),
            None => tracing::warn!(
                target: HEALTH_TARGET,
                event = "collection_loaded",
                cards,
                "no collection snapshot configured; serving an empty collection"
            ),
        }
    }

    fn bootstrap_succeeded(&self, config: &Config) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "bootstrap_succeeded",
            socket = %config.daemon_socket(),
            log_filter = %config.log_filter(),
            log_format = ?config.log_format(),
            "daemon bootstrap completed"
        );
    }

    fn bootstrap_failed(&self, error: &BootstrapError) {
        tracing::error!(
            target: HEALTH_TARGET,
            event = "bootstrap_failed",
            error = %error,
            "daemon bootstrap failed"
        );
    }

    fn listener_ready(&self, endpoint: &SocketEndpoint) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "listener_ready",
            endpoint = %endpoint,
            "accepting connections"
        );
    }

    fn listener_stopped(&self, endpoint: &SocketEndpoint) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "listener_stopped",
            endpoint = %endpoint,
            "listener stopped"
        );
    }
}
