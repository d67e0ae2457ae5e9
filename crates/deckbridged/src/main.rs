//! Entry point for the card template API daemon.

use std::io::{self, Write};
use std::process::ExitCode;

fn main() -> ExitCode {
    match deckbridged::run_daemon() {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            // Telemetry may not be installed yet.
            let mut stderr = io::stderr().lock();
            if writeln!(stderr, "deckbridged: {error}").is_err() {
                return ExitCode::from(2);
            }
            ExitCode::FAILURE
        }
    }
}
