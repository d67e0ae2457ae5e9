//! Shared harness for the daemon suites.

mod collection;
mod config_loader;
mod reporter;
mod world;

pub(crate) use collection::{DEVELOPER, api_call, contract_body, sample_api, sample_snapshot};
pub(crate) use config_loader::{FailingConfigLoader, TestConfigLoader};
pub(crate) use reporter::{HealthEvent, RecordingHealthReporter};
pub(crate) use world::{BootstrapWorld, DispatchWorld};
