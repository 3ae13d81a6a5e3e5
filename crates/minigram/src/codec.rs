//! Payload interpretation for datagram bodies.
//!
//! Incoming bytes are interpreted through three tiers: structured JSON,
//! UTF-8 text, raw bytes. Decoding never fails; each tier falls back to the
//! next. Parse success takes precedence, so the text `"42"` decodes to a
//! JSON number and `"false"` to a JSON boolean rather than staying text.

use std::fmt;

use serde::Serialize;

use crate::error::{Error, Result};

/// A datagram body in its most structured usable form.
///
/// # Example
///
/// ```
/// use minigram::Payload;
///
/// assert_eq!(Payload::decode(b"hello"), Payload::Text("hello".into()));
/// assert_eq!(Payload::decode(b"42"), Payload::Value(42.into()));
/// assert_eq!(Payload::decode(&[0xff, 0xfe]), Payload::Bytes(vec![0xff, 0xfe]));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Payload {
    /// A JSON value parsed from the full datagram body.
    Value(serde_json::Value),
    /// Valid UTF-8 that did not parse as JSON.
    Text(String),
    /// Bytes that were not valid UTF-8, unchanged.
    Bytes(Vec<u8>),
}

impl Payload {
    /// Interpret raw datagram bytes.
    ///
    /// Tries strict UTF-8 decoding first; failures come back as
    /// [`Payload::Bytes`] with the input unchanged. Valid UTF-8 is then
    /// parsed as JSON, falling back to [`Payload::Text`] when the full
    /// string is not a JSON document.
    pub fn decode(bytes: &[u8]) -> Self {
        match std::str::from_utf8(bytes) {
            Ok(text) => match serde_json::from_str(text) {
                Ok(value) => Self::Value(value),
                Err(_) => Self::Text(text.to_string()),
            },
            Err(_) => Self::Bytes(bytes.to_vec()),
        }
    }

    /// Serialize for transmission.
    ///
    /// `Value` becomes its compact JSON text, `Text` its UTF-8 bytes, and
    /// `Bytes` passes through unchanged.
    pub fn into_bytes(self) -> Result<Vec<u8>> {
        match self {
            Self::Value(value) => serde_json::to_vec(&value).map_err(Error::encode),
            Self::Text(text) => Ok(text.into_bytes()),
            Self::Bytes(bytes) => Ok(bytes),
        }
    }

    /// Whether this payload carries a structured JSON value.
    pub fn is_value(&self) -> bool {
        matches!(self, Self::Value(_))
    }
}

impl fmt::Display for Payload {
    /// `Value` renders as compact JSON, `Text` verbatim, `Bytes` as
    /// lowercase hex.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(value) => write!(f, "{value}"),
            Self::Text(text) => f.write_str(text),
            Self::Bytes(bytes) => {
                for byte in bytes {
                    write!(f, "{byte:02x}")?;
                }
                Ok(())
            }
        }
    }
}

impl From<serde_json::Value> for Payload {
    fn from(value: serde_json::Value) -> Self {
        Self::Value(value)
    }
}

impl From<String> for Payload {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for Payload {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<Vec<u8>> for Payload {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(bytes)
    }
}

impl From<&[u8]> for Payload {
    fn from(bytes: &[u8]) -> Self {
        Self::Bytes(bytes.to_vec())
    }
}
