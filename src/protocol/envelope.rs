//! JSON envelope message type.
//!
//! The envelope is the wire format of the optional JSON sub-protocol: every
//! payload travels as a text frame containing `{"type": ..., "data": ...}`.
//! The reserved type [`TEXT_TYPE`] marks plain text; every other type is
//! application-defined.
//!
//! # Format
//!
//! ```json
//! { "type": "ping-event", "data": { "n": 1 } }
//! { "type": "$text$", "data": "hello" }
//! ```

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;

// ============================================================================
// Constants
// ============================================================================

/// Reserved envelope type carrying plain text in `data`.
pub const TEXT_TYPE: &str = "$text$";

// ============================================================================
// Envelope
// ============================================================================

/// A typed JSON payload: `{type, data}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Application-defined payload type, or [`TEXT_TYPE`] for plain text.
    #[serde(rename = "type")]
    pub kind: String,

    /// The payload itself.
    pub data: Value,
}

impl Envelope {
    /// Creates an envelope from an already-converted JSON value.
    #[inline]
    #[must_use]
    pub fn new(kind: impl Into<String>, data: Value) -> Self {
        Self {
            kind: kind.into(),
            data,
        }
    }

    /// Creates a plain-text envelope.
    #[inline]
    #[must_use]
    pub fn text(message: impl Into<String>) -> Self {
        Self::new(TEXT_TYPE, Value::String(message.into()))
    }

    /// Creates an envelope from any serializable payload.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Encoding`](crate::Error::Encoding) if `payload`
    /// cannot be represented as JSON.
    pub fn from_payload<T>(kind: impl Into<String>, payload: &T) -> Result<Self>
    where
        T: Serialize + ?Sized,
    {
        let data = serde_json::to_value(payload)?;
        Ok(Self::new(kind, data))
    }

    /// Returns `true` if this is a plain-text envelope.
    #[inline]
    #[must_use]
    pub fn is_text(&self) -> bool {
        self.kind == TEXT_TYPE
    }

    /// Serializes the envelope to its wire form.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Encoding`](crate::Error::Encoding) on serialization
    /// failure.
    pub fn encode(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parses an envelope from its wire form.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Encoding`](crate::Error::Encoding) if `text` is not
    /// valid JSON or lacks the envelope fields.
    pub fn decode(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    #[test]
    fn test_wire_format() {
        let envelope = Envelope::text("hello");
        assert_eq!(
            envelope.encode().expect("encode"),
            r#"{"type":"$text$","data":"hello"}"#
        );
    }

    #[test]
    fn test_decode_typed_payload() {
        let envelope =
            Envelope::decode(r#"{"type":"ping-event","data":{"n":1}}"#).expect("decode");

        assert_eq!(envelope.kind, "ping-event");
        assert!(!envelope.is_text());
        assert_eq!(envelope.data, json!({ "n": 1 }));
    }

    #[test]
    fn test_decode_rejects_non_json() {
        let err = Envelope::decode("not json").expect_err("should fail");
        assert!(err.is_encoding_error());
    }

    #[test]
    fn test_decode_rejects_missing_fields() {
        let err = Envelope::decode(r#"{"kind":"wrong"}"#).expect_err("should fail");
        assert!(err.is_encoding_error());
    }

    #[test]
    fn test_from_payload() {
        #[derive(Serialize)]
        struct Sample {
            n: u32,
        }

        let envelope = Envelope::from_payload("sample", &Sample { n: 7 }).expect("payload");
        assert_eq!(envelope.kind, "sample");
        assert_eq!(envelope.data, json!({ "n": 7 }));
    }

    #[test]
    fn test_text_envelope_is_text() {
        assert!(Envelope::text("x").is_text());
        assert!(!Envelope::new("x", Value::Null).is_text());
    }
}
