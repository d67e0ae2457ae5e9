//! Response envelopes returned to card template scripts.

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::errors::{ErrorCode, JsApiError};

/// Outcome of one dispatched call.
///
/// Serializes to exactly one of two shapes:
/// `{"success":true,"value":..}` or
/// `{"success":false,"code":..,"message":..}`. A success always carries a
/// `value` key, even when the value is `null`.
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    /// The operation completed.
    Success(Value),
    /// The operation was refused or failed in a way the script can handle.
    Failure {
        /// Error kind.
        code: ErrorCode,
        /// Human-readable description.
        message: String,
    },
}

impl Response {
    /// Wraps any serializable value in a success envelope.
    ///
    /// # Errors
    ///
    /// Returns [`JsApiError::Serialize`] if the value cannot be represented as JSON.
    pub fn success<T: Serialize>(value: T) -> Result<Self, JsApiError> {
        serde_json::to_value(value)
            .map(Self::Success)
            .map_err(JsApiError::Serialize)
    }

    /// Success without a meaningful value.
    #[must_use]
    pub const fn empty() -> Self {
        Self::Success(Value::Null)
    }

    /// Builds a failure envelope.
    pub fn failure(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Failure {
            code,
            message: message.into(),
        }
    }

    /// Whether this is a success envelope.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Encodes the envelope as JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns [`JsApiError::Serialize`] if encoding fails.
    pub fn encode(&self) -> Result<Vec<u8>, JsApiError> {
        serde_json::to_vec(self).map_err(JsApiError::Serialize)
    }
}

impl Serialize for Response {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Success(value) => {
                let mut state = serializer.serialize_struct("Response", 2)?;
                state.serialize_field("success", &true)?;
                state.serialize_field("value", value)?;
                state.end()
            }
            Self::Failure { code, message } => {
                let mut state = serializer.serialize_struct("Response", 3)?;
                state.serialize_field("success", &false)?;
                state.serialize_field("code", code)?;
                state.serialize_field("message", message)?;
                state.end()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    fn decode(response: &Response) -> Value {
        let bytes = response.encode().expect("encode response");
        serde_json::from_slice(&bytes).expect("response is valid JSON")
    }

    #[rstest]
    #[case(Value::Null)]
    #[case(json!("Spanish::Verbs"))]
    #[case(json!(true))]
    #[case(json!(7_i32))]
    #[case(json!(1_700_000_000_123_i64))]
    #[case(json!([1_i64, 2_i64, 1_700_000_000_123_i64]))]
    fn success_values_survive_encoding(#[case] value: Value) {
        let response = Response::success(&value).expect("serializable value");
        assert_eq!(decode(&response), json!({"success": true, "value": value}));
    }

    #[test]
    fn empty_success_keeps_the_value_key() {
        let encoded = String::from_utf8(Response::empty().encode().expect("encode"))
            .expect("utf8 output");
        assert_eq!(encoded, r#"{"success":true,"value":null}"#);
    }

    #[test]
    fn failures_carry_code_and_message_only() {
        let response = Response::failure(ErrorCode::InvalidInput, "No search query found");
        assert_eq!(
            decode(&response),
            json!({"success": false, "code": 4, "message": "No search query found"})
        );
        assert!(!response.is_success());
    }
}
