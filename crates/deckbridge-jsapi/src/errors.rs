//! Error taxonomy for endpoint dispatch.
//!
//! Every failure a card template script can act on maps to an [`ErrorCode`]
//! and is recovered into a failure envelope at the dispatch boundary. Failures
//! outside that taxonomy (malformed request bodies, backend faults, poisoned
//! locks) propagate to the embedding host instead.

use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::collection::CollectionError;
use crate::contract::ContractError;
use crate::endpoint::Endpoint;
use crate::messages::ContractMessages;
use crate::response::Response;
use crate::speech::SpeechError;

/// Message returned for endpoints that are catalogued but not implemented.
pub const UNSUPPORTED_METHOD_MESSAGE: &str = "Method not supported";

/// Integer codes reported in failure envelopes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// Developer contact absent or blank.
    MissingContact,
    /// API version absent, unparseable, or from the future.
    InvalidVersion,
    /// API version targets an older major release.
    OutdatedVersion,
    /// A required payload field is missing or out of range.
    InvalidInput,
    /// A referenced card or note does not exist.
    NotFound,
    /// The endpoint is catalogued but not wired to a capability.
    UnsupportedMethod,
    /// The requested capability is currently unavailable.
    FeatureNotAvailable,
    /// The speech engine reported a failure.
    TtsError,
}

impl ErrorCode {
    /// Wire value of the code.
    #[must_use]
    pub const fn value(self) -> i32 {
        match self {
            Self::MissingContact => 1,
            Self::InvalidVersion => 2,
            Self::OutdatedVersion => 3,
            Self::InvalidInput => 4,
            Self::NotFound => 5,
            Self::UnsupportedMethod => 6,
            Self::FeatureNotAvailable => 7,
            Self::TtsError => 8,
        }
    }
}

impl Serialize for ErrorCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i32(self.value())
    }
}

/// Errors raised while parsing, validating, or dispatching a call.
#[derive(Debug, Error)]
pub enum JsApiError {
    /// The caller contract was rejected.
    #[error(transparent)]
    Contract(#[from] ContractError),

    /// A required payload field is missing or invalid.
    #[error("invalid input: {message}")]
    InvalidInput {
        /// Script-facing description of the problem.
        message: String,
    },

    /// The operation cannot run in the current state.
    #[error("feature not available: {message}")]
    FeatureNotAvailable {
        /// Script-facing description of the problem.
        message: String,
    },

    /// The endpoint is recognised but not implemented.
    #[error("method not supported: {endpoint}")]
    UnsupportedMethod {
        /// Endpoint the caller attempted to use.
        endpoint: Endpoint,
    },

    /// The speech engine failed.
    #[error("text-to-speech failed: {0}")]
    Tts(#[from] SpeechError),

    /// The collection rejected or failed the operation.
    #[error(transparent)]
    Collection(#[from] CollectionError),

    /// The request body is not a JSON object of the expected shape.
    #[error("malformed request: {message}")]
    Malformed {
        /// Parser diagnostic.
        message: String,
        /// Underlying JSON error, when one exists.
        #[source]
        source: Option<serde_json::Error>,
    },

    /// A handler value could not be converted to JSON.
    #[error("failed to serialize response value: {0}")]
    Serialize(#[source] serde_json::Error),
}

impl JsApiError {
    /// Creates an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Creates a feature-not-available error.
    pub fn feature_not_available(message: impl Into<String>) -> Self {
        Self::FeatureNotAvailable {
            message: message.into(),
        }
    }

    /// Creates an unsupported method error for `endpoint`.
    #[must_use]
    pub const fn unsupported(endpoint: Endpoint) -> Self {
        Self::UnsupportedMethod { endpoint }
    }

    /// Creates a malformed request error from a JSON parser failure.
    #[must_use]
    pub fn from_json_error(source: serde_json::Error) -> Self {
        Self::Malformed {
            message: source.to_string(),
            source: Some(source),
        }
    }

    /// Creates a malformed request error with a custom message.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed {
            message: message.into(),
            source: None,
        }
    }

    /// Code reported to the script, or `None` when the error is not part of
    /// the recoverable taxonomy.
    #[must_use]
    pub const fn code(&self) -> Option<ErrorCode> {
        match self {
            Self::Contract(error) => Some(error.code()),
            Self::InvalidInput { .. } => Some(ErrorCode::InvalidInput),
            Self::FeatureNotAvailable { .. } => Some(ErrorCode::FeatureNotAvailable),
            Self::UnsupportedMethod { .. } => Some(ErrorCode::UnsupportedMethod),
            Self::Tts(_) => Some(ErrorCode::TtsError),
            Self::Collection(CollectionError::NotFound { .. }) => Some(ErrorCode::NotFound),
            Self::Collection(_) | Self::Malformed { .. } | Self::Serialize(_) => None,
        }
    }

    /// Converts a recoverable error into a failure envelope.
    ///
    /// # Errors
    ///
    /// Returns `self` unchanged when the error must propagate to the host.
    pub fn into_failure(self, messages: &ContractMessages) -> Result<Response, Self> {
        let Some(code) = self.code() else {
            return Err(self);
        };
        let message = match self {
            Self::Contract(error) => error.localized_message(messages),
            Self::InvalidInput { message } | Self::FeatureNotAvailable { message } => message,
            Self::UnsupportedMethod { .. } => UNSUPPORTED_METHOD_MESSAGE.to_owned(),
            Self::Tts(error) => error.script_message().to_owned(),
            Self::Collection(CollectionError::NotFound { kind, id }) => {
                format!("Found no {kind} with the id '{id}'")
            }
            other => return Err(other),
        };
        Ok(Response::failure(code, message))
    }
}
