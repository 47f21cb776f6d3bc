//! Config value type.
//!
//! A document value is exactly one of three states: plain text, plaintext
//! waiting to be encrypted, or base64 ciphertext.

use serde_yaml::{Mapping, Value};

use crate::core::constants::{ENCRYPTED, TO_ENCRYPT};

/// A single configuration value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ConfigValue {
    /// Used as-is.
    Plain(String),
    /// Plaintext flagged for encryption on the next encrypt pass.
    PendingEncryption(String),
    /// Base64-encoded KMS ciphertext.
    Encrypted(String),
}

impl ConfigValue {
    /// Parse a raw YAML value.
    ///
    /// Returns `None` for any shape other than a string, `{to_encrypt: <string>}`
    /// or `{encrypted: <string>}`.
    pub fn from_yaml(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(Self::Plain(s.clone())),
            Value::Mapping(map) if map.len() == 1 => {
                let (tag, payload) = map.iter().next()?;
                let payload = payload.as_str()?.to_string();
                match tag.as_str()? {
                    TO_ENCRYPT => Some(Self::PendingEncryption(payload)),
                    ENCRYPTED => Some(Self::Encrypted(payload)),
                    _ => None,
                }
            }
            _ => None,
        }
    }

    /// Convert back into the raw YAML shape.
    pub fn to_yaml(&self) -> Value {
        match self {
            Self::Plain(text) => Value::String(text.clone()),
            Self::PendingEncryption(text) => tagged(TO_ENCRYPT, text),
            Self::Encrypted(ciphertext) => tagged(ENCRYPTED, ciphertext),
        }
    }

    /// The text carried by this value, whatever its state.
    pub fn text(&self) -> &str {
        match self {
            Self::Plain(text) | Self::PendingEncryption(text) | Self::Encrypted(text) => text,
        }
    }

    /// Whether this value holds ciphertext.
    pub fn is_encrypted(&self) -> bool {
        matches!(self, Self::Encrypted(_))
    }
}

fn tagged(tag: &str, payload: &str) -> Value {
    let mut map = Mapping::new();
    map.insert(
        Value::String(tag.to_string()),
        Value::String(payload.to_string()),
    );
    Value::Mapping(map)
}
