//! Connection handler that feeds request lines into the template API.

use std::io::{self, Read};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use deckbridge_jsapi::JsApi;

use crate::transport::{ConnectionHandler, ConnectionStream};

use super::DISPATCH_TARGET;
use super::errors::DispatchError;
use super::request::HostRequest;
use super::response::ResponseWriter;

/// Maximum size of a request line in bytes.
pub(crate) const MAX_REQUEST_BYTES: usize = 1024 * 1024;

/// Idle limit for reading the request and writing the reply.
const CONNECTION_TIMEOUT: Duration = Duration::from_secs(30);

/// Serves one request per connection against a shared [`JsApi`].
#[derive(Debug)]
pub(crate) struct DispatchConnectionHandler {
    api: Arc<JsApi>,
}

impl DispatchConnectionHandler {
    pub(crate) const fn new(api: Arc<JsApi>) -> Self {
        Self { api }
    }

    fn dispatch(&self, mut stream: ConnectionStream) {
        let peer = stream.peer();
        if let Err(error) = stream.set_io_timeout(Some(CONNECTION_TIMEOUT)) {
            debug!(target: DISPATCH_TARGET, %peer, %error, "failed to bound connection IO");
        }
        let line = match read_request_line(&mut stream) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                debug!(target: DISPATCH_TARGET, %peer, "client disconnected without request");
                return;
            }
            Err(error) => {
                warn!(target: DISPATCH_TARGET, %error, "failed to read request");
                report(&mut ResponseWriter::new(&mut stream), &error);
                return;
            }
        };

        let mut writer = ResponseWriter::new(&mut stream);
        let outcome = self.serve(&line, &mut writer);
        if let Err(error) = outcome {
            warn!(target: DISPATCH_TARGET, %error, "request failed");
            report(&mut writer, &error);
        }
    }

    fn serve<W: io::Write>(
        &self,
        line: &[u8],
        writer: &mut ResponseWriter<W>,
    ) -> Result<(), DispatchError> {
        let request = HostRequest::parse(line)?;
        let body = request.body_bytes()?;
        debug!(
            target: DISPATCH_TARGET,
            path = request.path.as_str(),
            current_card = request.current_card.get(),
            "dispatching request"
        );
        match self.api.handle(&request.path, &body, request.current_card)? {
            Some(response) => {
                debug!(
                    target: DISPATCH_TARGET,
                    path = request.path.as_str(),
                    success = response.is_success(),
                    "answering request"
                );
                writer.write_response(&response)
            }
            None => writer.write_not_found(&request.path),
        }
    }
}

impl ConnectionHandler for DispatchConnectionHandler {
    fn handle(&self, stream: ConnectionStream) {
        self.dispatch(stream);
    }
}

fn report<W: io::Write>(writer: &mut ResponseWriter<W>, error: &DispatchError) {
    if let Err(write_error) = writer.write_error(error) {
        debug!(target: DISPATCH_TARGET, error = %write_error, "failed to report error");
    }
}

/// Reads one newline-terminated line, or everything up to EOF.
///
/// Returns `Ok(None)` when the client disconnects without sending data.
fn read_request_line<R: Read>(stream: &mut R) -> Result<Option<Vec<u8>>, DispatchError> {
    let mut buffer = Vec::new();
    let mut chunk = [0_u8; 1024];

    loop {
        let bytes_read = read_with_retry(stream, &mut chunk)?;
        let Some(received) = chunk.get(..bytes_read) else {
            return Err(DispatchError::malformed("reader overran its buffer"));
        };
        if received.is_empty() {
            return Ok((!buffer.is_empty()).then_some(buffer));
        }

        if let Some(newline) = received.iter().position(|byte| *byte == b'\n') {
            buffer.extend(received.iter().take(newline + 1));
            enforce_limit(buffer.len())?;
            return Ok(Some(buffer));
        }

        buffer.extend_from_slice(received);
        enforce_limit(buffer.len())?;
    }
}

fn read_with_retry<R: Read>(stream: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    loop {
        match stream.read(buf) {
            Ok(read) => return Ok(read),
            Err(error) if error.kind() == io::ErrorKind::Interrupted => {}
            Err(error) => return Err(error),
        }
    }
}

const fn enforce_limit(size: usize) -> Result<(), DispatchError> {
    if size > MAX_REQUEST_BYTES {
        return Err(DispatchError::request_too_large(size, MAX_REQUEST_BYTES));
    }
    Ok(())
}
