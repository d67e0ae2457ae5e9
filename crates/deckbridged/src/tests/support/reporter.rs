//! [`HealthReporter`] double that records events for assertions.

use std::sync::{Mutex, PoisonError};

use camino::Utf8Path;

use deckbridge_config::{Config, SocketEndpoint};

use crate::bootstrap::BootstrapError;
use crate::health::HealthReporter;

/// Lifecycle events observed during a scenario.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum HealthEvent {
    BootstrapStarting,
    CollectionLoaded { from_file: bool, cards: usize },
    BootstrapSucceeded,
    BootstrapFailed(String),
    ListenerReady(String),
    ListenerStopped(String),
}

#[derive(Debug, Default)]
pub(crate) struct RecordingHealthReporter {
    events: Mutex<Vec<HealthEvent>>,
}

impl RecordingHealthReporter {
    pub(crate) fn events(&self) -> Vec<HealthEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn record(&self, event: HealthEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}

impl HealthReporter for RecordingHealthReporter {
    fn bootstrap_starting(&self) {
        self.record(HealthEvent::BootstrapStarting);
    }

    fn collection_loaded(&self, source: Option<&Utf8Path>, cards: usize) {
        self.record(HealthEvent::CollectionLoaded {
            from_file: source.is_some(),
            cards,
        });
    }

    fn bootstrap_succeeded(&self, _config: &Config) {
        self.record(HealthEvent::BootstrapSucceeded);
    }

    fn bootstrap_failed(&self, error: &BootstrapError) {
        self.record(HealthEvent::BootstrapFailed(error.to_string()));
    }

    fn listener_ready(&self, endpoint: &SocketEndpoint) {
        self.record(HealthEvent::ListenerReady(endpoint.to_string()));
    }

    fn listener_stopped(&self, endpoint: &SocketEndpoint) {
        self.record(HealthEvent::ListenerStopped(endpoint.to_string()));
    }
}
