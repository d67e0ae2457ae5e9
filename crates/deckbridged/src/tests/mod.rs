//! Test suites for the daemon.

mod process_behaviour;
pub(crate) mod support;
