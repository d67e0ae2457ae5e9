//! End-to-end run of the daemon lifecycle over a Unix socket.

#![cfg(unix)]

use std::io::{BufRead, BufReader, Write};
use std::os::unix::net::UnixStream;
use std::sync::{Arc, Mutex, PoisonError};

use camino::Utf8PathBuf;
use rstest::rstest;
use serde_json::Value;

use crate::health::HealthReporter;
use crate::process::launch::run_daemon_with;
use crate::process::{ShutdownError, ShutdownSignal};
use crate::speech::TracingSpeech;

use super::support::{
    HealthEvent, RecordingHealthReporter, TestConfigLoader, api_call, sample_snapshot,
};

/// Shutdown signal that makes one call before letting the daemon stop.
struct CallThenStop {
    socket: Utf8PathBuf,
    line: String,
    reply: Mutex<Option<Value>>,
}

impl ShutdownSignal for CallThenStop {
    fn wait(&self) -> Result<(), ShutdownError> {
        let mut stream = UnixStream::connect(&self.socket).expect("connect to daemon");
        stream
            .write_all(format!("{}\n", self.line).as_bytes())
            .expect("write request");
        let mut reply = String::new();
        BufReader::new(stream)
            .read_line(&mut reply)
            .expect("read reply");
        *self.reply.lock().unwrap_or_else(PoisonError::into_inner) =
            Some(serde_json::from_str(&reply).expect("json reply"));
        Ok(())
    }
}

#[rstest]
fn daemon_serves_until_shutdown_then_removes_its_socket() {
    let loader = TestConfigLoader::new().with_snapshot(&sample_snapshot());
    let socket = loader.socket_path();
    let reporter = Arc::new(RecordingHealthReporter::default());
    let signal = CallThenStop {
        socket: socket.clone(),
        line: api_call("/jsapi/card/get-did", "1.0.0", None, 44),
        reply: Mutex::new(None),
    };

    let health: Arc<dyn HealthReporter> = Arc::<RecordingHealthReporter>::clone(&reporter);
    run_daemon_with(
        &loader,
        health,
        Arc::new(TracingSpeech::new()),
        &signal,
    )
    .expect("daemon runs to completion");

    let reply = signal
        .reply
        .into_inner()
        .unwrap_or_else(PoisonError::into_inner)
        .expect("call answered");
    assert_eq!(reply["kind"], "response");
    assert_eq!(reply["body"]["value"], 1);

    let endpoint = format!("unix://{socket}");
    let events = reporter.events();
    assert!(events.contains(&HealthEvent::ListenerReady(endpoint.clone())));
    assert_eq!(events.last(), Some(&HealthEvent::ListenerStopped(endpoint)));
    assert!(!socket.exists(), "socket file should be removed on shutdown");
}
