//! Request line decoding.

use serde::Deserialize;
use serde_json::Value;

use deckbridge_jsapi::CardId;

use super::errors::DispatchError;

/// One API call forwarded by a card viewer.
#[derive(Debug, Deserialize)]
pub struct HostRequest {
    /// Request path, for example `/jsapi/card/get-id`.
    pub path: String,
    /// Script request body, either as a JSON object or as its raw JSON text.
    #[serde(default)]
    pub body: Value,
    /// Card shown to the user when the script made the call.
    #[serde(default)]
    pub current_card: CardId,
}

impl HostRequest {
    /// Parses a JSONL line. Trailing whitespace, including the newline, is
    /// ignored.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::MalformedJsonl`] for empty lines, invalid JSON,
    /// or a line that does not match the request schema.
    pub fn parse(line: &[u8]) -> Result<Self, DispatchError> {
        let trimmed = line.trim_ascii_end();
        if trimmed.is_empty() {
            return Err(DispatchError::malformed("empty request line"));
        }
        serde_json::from_slice(trimmed).map_err(DispatchError::from_json_error)
    }

    /// Body bytes as the dispatcher expects them.
    ///
    /// A string body is passed through verbatim; anything else is re-encoded.
    /// A missing body yields an empty slice, which the dispatcher rejects as
    /// malformed.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::SerializeResponse`] if re-encoding fails.
    pub fn body_bytes(&self) -> Result<Vec<u8>, DispatchError> {
        match &self.body {
            Value::Null => Ok(Vec::new()),
            Value::String(raw) => Ok(raw.as_bytes().to_vec()),
            other => Ok(serde_json::to_vec(other)?),
        }
    }
}
