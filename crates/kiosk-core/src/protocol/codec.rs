//! Decoding of management API response bodies.
//!
//! Every management reply is a JSON object.  A body that is not valid JSON,
//! or whose top-level value is an array/string/number, is a protocol error
//! and the caller treats the call as failed with an "invalid response".

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

/// Errors that can occur while decoding a response body.
#[derive(Debug, Error, PartialEq)]
pub enum ProtocolError {
    /// The body was empty.
    #[error("empty response body")]
    Empty,

    /// The body is not JSON at all.
    #[error("malformed JSON: {0}")]
    MalformedJson(String),

    /// The body is JSON but the top-level value is not an object.
    #[error("expected a JSON object, got {0}")]
    NotAnObject(&'static str),

    /// The object does not match the expected document shape.
    #[error("unexpected document shape: {0}")]
    InvalidField(String),
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Parses `body` into the typed response document `T`.
///
/// # Errors
///
/// Returns [`ProtocolError`] if the body is empty, not JSON, not an object, or
/// a field carries a value that cannot be coerced into its declared type.
///
/// # Examples
///
/// ```rust
/// use kiosk_core::protocol::codec::parse_response;
/// use kiosk_core::protocol::response::LogoutResponse;
///
/// let resp: LogoutResponse = parse_response(br#"{"logged_out": true}"#).unwrap();
/// assert!(resp.logged_out);
/// ```
pub fn parse_response<T: DeserializeOwned>(body: &[u8]) -> Result<T, ProtocolError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(ProtocolError::Empty);
    }

    let value: Value =
        serde_json::from_slice(body).map_err(|e| ProtocolError::MalformedJson(e.to_string()))?;

    if !value.is_object() {
        return Err(ProtocolError::NotAnObject(kind_of(&value)));
    }

    serde_json::from_value(value).map_err(|e| ProtocolError::InvalidField(e.to_string()))
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::response::{LoginResponse, UserDataResponse};

    #[test]
    fn test_parse_valid_object() {
        // Arrange
        let body = br#"{"authenticated": true, "units": 10}"#;

        // Act
        let resp: LoginResponse = parse_response(body).unwrap();

        // Assert
        assert!(resp.authenticated);
        assert_eq!(resp.units, 10);
    }

    #[test]
    fn test_parse_empty_body_is_rejected() {
        let result = parse_response::<LoginResponse>(b"  \n");
        assert_eq!(result, Err(ProtocolError::Empty));
    }

    #[test]
    fn test_parse_non_json_is_rejected() {
        let result = parse_response::<LoginResponse>(b"<html>502 Bad Gateway</html>");
        assert!(matches!(result, Err(ProtocolError::MalformedJson(_))));
    }

    #[test]
    fn test_parse_array_is_rejected() {
        let result = parse_response::<UserDataResponse>(b"[1, 2, 3]");
        assert_eq!(result, Err(ProtocolError::NotAnObject("an array")));
    }

    #[test]
    fn test_parse_bad_field_value_is_rejected() {
        let result = parse_response::<UserDataResponse>(br#"{"units": "many"}"#);
        assert!(matches!(result, Err(ProtocolError::InvalidField(_))));
    }
}
