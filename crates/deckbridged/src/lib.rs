//! Host daemon for the card template API.
//!
//! `deckbridged` stands in for the card viewer's web server. A viewer forwards
//! every `/jsapi/...` call a template script makes as one JSONL line over a
//! Unix or TCP socket; the daemon hands it to [`deckbridge_jsapi::JsApi`] and
//! writes the envelope back.
//!
//! Startup is a short, reported sequence: load the layered configuration,
//! install structured telemetry, prepare the socket directory, and load the
//! collection snapshot. Each stage emits a [`HealthReporter`] event so failures
//! are visible in the logs before the listener ever binds.

mod bootstrap;
mod dispatch;
mod health;
mod process;
mod speech;
mod telemetry;
mod transport;

pub use bootstrap::{
    BootstrapError, ConfigLoader, Daemon, StaticConfigLoader, SystemConfigLoader, bootstrap_with,
    read_snapshot,
};
pub use dispatch::{DispatchError, HostMessage, HostRequest, ResponseWriter};
pub use health::{HealthReporter, StructuredHealthReporter};
pub use process::{LaunchError, ShutdownError, ShutdownSignal, SystemShutdownSignal, run_daemon};
pub use speech::{LANG_AVAILABLE, LANG_NOT_SUPPORTED, TracingSpeech, VoiceSettings};
pub use telemetry::{TelemetryError, TelemetryHandle, initialise as initialise_telemetry};
pub use transport::ListenerError;

#[cfg(test)]
mod tests;
