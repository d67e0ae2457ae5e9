//! Request body decoding and payload access.
//!
//! A request body is a JSON object carrying the caller contract
//! (`developer`, `version`) and an optional `data` object. The contract is
//! validated during parsing so no handler ever sees an unvalidated call.

use serde_json::{Map, Value};

use crate::contract::validate_contract;
use crate::errors::JsApiError;

/// Decoded request body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JsApiRequest {
    developer: Option<String>,
    version: Option<String>,
    data: Option<Payload>,
}

impl JsApiRequest {
    /// Parses a request body from raw bytes.
    ///
    /// Trailing whitespace is ignored. Fields of the wrong JSON type read as
    /// absent.
    ///
    /// # Errors
    ///
    /// Returns [`JsApiError::Malformed`] when the bytes are not a JSON object.
    pub fn parse(bytes: &[u8]) -> Result<Self, JsApiError> {
        let trimmed = bytes.trim_ascii_end();
        if trimmed.is_empty() {
            return Err(JsApiError::malformed("empty request body"));
        }
        let value: Value = serde_json::from_slice(trimmed).map_err(JsApiError::from_json_error)?;
        Self::from_value(value)
    }

    /// Builds a request from an already decoded JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`JsApiError::Malformed`] when `value` is not an object.
    pub fn from_value(value: Value) -> Result<Self, JsApiError> {
        let Value::Object(mut fields) = value else {
            return Err(JsApiError::malformed("request body must be a JSON object"));
        };
        let data = match fields.remove("data") {
            Some(Value::Object(map)) => Some(Payload::new(map)),
            _ => None,
        };
        Ok(Self {
            developer: take_string(&mut fields, "developer"),
            version: take_string(&mut fields, "version"),
            data,
        })
    }

    /// Declared developer contact.
    #[must_use]
    pub fn developer(&self) -> Option<&str> {
        self.developer.as_deref()
    }

    /// Declared API version.
    #[must_use]
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Validates the contract and yields the payload.
    ///
    /// # Errors
    ///
    /// Returns [`JsApiError::Contract`] when the contract is rejected.
    pub fn into_validated_data(self) -> Result<Option<Payload>, JsApiError> {
        validate_contract(self.developer(), self.version())?;
        Ok(self.data)
    }
}

fn take_string(fields: &mut Map<String, Value>, key: &str) -> Option<String> {
    match fields.remove(key) {
        Some(Value::String(text)) => Some(text),
        _ => None,
    }
}

/// Operation arguments supplied in the request's `data` object.
///
/// Accessors return `None` for absent fields, JSON `null`, and values of the
/// wrong type, so handlers treat all three as "not supplied".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Payload {
    fields: Map<String, Value>,
}

impl Payload {
    /// Wraps a JSON object.
    #[must_use]
    pub const fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Reads a 64-bit integer field.
    #[must_use]
    pub fn long(&self, key: &str) -> Option<i64> {
        self.fields.get(key).and_then(Value::as_i64)
    }

    /// Reads a 32-bit integer field. Integers outside the `i32` range read as absent.
    #[must_use]
    pub fn int(&self, key: &str) -> Option<i32> {
        self.long(key).and_then(|value| i32::try_from(value).ok())
    }

    /// Reads a numeric field as a float.
    #[must_use]
    pub fn double(&self, key: &str) -> Option<f64> {
        self.fields.get(key).and_then(Value::as_f64)
    }

    /// Reads a string field.
    #[must_use]
    pub fn string(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }
}

impl From<Map<String, Value>> for Payload {
    fn from(fields: Map<String, Value>) -> Self {
        Self::new(fields)
    }
}
