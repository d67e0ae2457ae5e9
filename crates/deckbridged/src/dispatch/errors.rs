//! Errors raised while serving one connection.

use std::io;

use thiserror::Error;

use deckbridge_jsapi::JsApiError;

/// Errors surfaced while reading, dispatching, or answering a request.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The request line is not a valid host request.
    #[error("malformed JSONL: {message}")]
    MalformedJsonl {
        /// Description of the problem.
        message: String,
        /// Decoder error, when one was raised.
        #[source]
        source: Option<serde_json::Error>,
    },

    /// The request line exceeds the size limit.
    #[error("request too large: {size} bytes exceeds {max_size} byte limit")]
    RequestTooLarge {
        /// Bytes read so far.
        size: usize,
        /// Configured limit.
        max_size: usize,
    },

    /// The dispatcher rejected the call outside the script error taxonomy.
    #[error(transparent)]
    Api(#[from] JsApiError),

    /// Reading or writing the socket failed.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Encoding the reply failed.
    #[error("failed to serialize response: {0}")]
    SerializeResponse(#[from] serde_json::Error),
}

impl DispatchError {
    /// Wraps a decoder error.
    #[must_use]
    pub fn from_json_error(source: serde_json::Error) -> Self {
        Self::MalformedJsonl {
            message: source.to_string(),
            source: Some(source),
        }
    }

    /// Malformed request with a custom message.
    #[must_use]
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedJsonl {
            message: message.into(),
            source: None,
        }
    }

    /// Request exceeded `max_size` bytes.
    #[must_use]
    pub const fn request_too_large(size: usize, max_size: usize) -> Self {
        Self::RequestTooLarge { size, max_size }
    }
}
