//! Reply framing for the dispatch loop.

use std::io::Write;

use serde::Serialize;

use deckbridge_jsapi::Response;

use super::errors::DispatchError;

/// The single line written back for each request.
#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HostMessage<'a> {
    /// The call reached an endpoint; `body` is the script envelope.
    Response {
        /// Envelope to hand to the script.
        body: &'a Response,
    },
    /// No endpoint matches the path; the viewer should answer 404.
    NotFound {
        /// Path as received.
        path: &'a str,
    },
    /// The request could not be served.
    Error {
        /// Human-readable cause.
        message: String,
    },
}

/// Writes [`HostMessage`] lines to a stream.
pub struct ResponseWriter<W> {
    writer: W,
}

impl<W: Write> ResponseWriter<W> {
    /// Wraps `writer`.
    pub const fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Writes one message as a JSONL line and flushes.
    ///
    /// # Errors
    ///
    /// Returns an error if serialisation or writing fails.
    pub fn write_message(&mut self, message: &HostMessage<'_>) -> Result<(), DispatchError> {
        serde_json::to_writer(&mut self.writer, message)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }

    /// Writes a script envelope.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_response(&mut self, body: &Response) -> Result<(), DispatchError> {
        self.write_message(&HostMessage::Response { body })
    }

    /// Reports an unknown path.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_not_found(&mut self, path: &str) -> Result<(), DispatchError> {
        self.write_message(&HostMessage::NotFound { path })
    }

    /// Reports a request that could not be served.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_error(&mut self, error: &DispatchError) -> Result<(), DispatchError> {
        self.write_message(&HostMessage::Error {
            message: error.to_string(),
        })
    }
}
