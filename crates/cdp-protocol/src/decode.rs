//! Tagged typed decoding of raw JSON payloads.
//!
//! Event and reply payloads arrive as untyped JSON. [`Decoded::from_value`]
//! attempts a typed decode and, on shape mismatch, returns the raw value
//! together with the decode error instead of swallowing it.

use serde::de::DeserializeOwned;
use serde_json::Value;

/// Result of decoding a raw payload into a typed value.
#[derive(Debug, Clone)]
pub enum Decoded<T> {
    /// The payload matched the expected shape.
    Typed(T),
    /// The payload did not match; the raw value is preserved for inspection.
    Raw { value: Value, error: String },
}

impl<T: DeserializeOwned> Decoded<T> {
    /// Decode `value`, keeping the raw value and error visible on mismatch.
    pub fn from_value(value: Value) -> Self {
        match serde_json::from_value::<T>(value.clone()) {
            Ok(typed) => Decoded::Typed(typed),
            Err(e) => Decoded::Raw {
                value,
                error: e.to_string(),
            },
        }
    }
}

impl<T> Decoded<T> {
    /// The typed value, if decoding succeeded.
    pub fn ok(self) -> Option<T> {
        match self {
            Decoded::Typed(t) => Some(t),
            Decoded::Raw { .. } => None,
        }
    }

    pub fn is_typed(&self) -> bool {
        matches!(self, Decoded::Typed(_))
    }
}
