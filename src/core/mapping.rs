//! Environment mapping.
//!
//! The typed, ordered form of a configuration document and the bulk
//! encrypt/decrypt/filter passes over it. Every pass returns a new mapping
//! with entries in the original order.

use serde_yaml::{Mapping, Value};
use tracing::debug;

use crate::core::constants::{APP_NAME, STAGE_NAME};
use crate::core::context::EncryptionContext;
use crate::core::kms::KeyAgent;
use crate::core::value::ConfigValue;
use crate::error::{ContextError, DocumentError, Result};

/// Ordered key → value configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvironmentMapping {
    entries: Vec<(String, ConfigValue)>,
}

impl EnvironmentMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a raw YAML document.
    ///
    /// # Errors
    ///
    /// Returns `DocumentError::NotAMapping` if `doc` is not a mapping,
    /// `DocumentError::NonStringKey` for non-string keys, and
    /// `DocumentError::InvalidValue` for values of any other shape than a
    /// string, `{to_encrypt: ...}` or `{encrypted: ...}`.
    pub fn from_document(doc: &Value) -> Result<Self> {
        let map = doc.as_mapping().ok_or(DocumentError::NotAMapping)?;

        let mut mapping = Self::new();
        for (key, value) in map {
            let key = key
                .as_str()
                .ok_or_else(|| DocumentError::NonStringKey(describe(key)))?;
            let value = ConfigValue::from_yaml(value).ok_or_else(|| DocumentError::InvalidValue {
                key: key.to_string(),
            })?;
            mapping.insert(key, value);
        }

        debug!(entries = mapping.len(), "document converted");
        Ok(mapping)
    }

    /// Convert back into a raw YAML document.
    pub fn to_document(&self) -> Value {
        let map: Mapping = self
            .entries
            .iter()
            .map(|(key, value)| (Value::String(key.clone()), value.to_yaml()))
            .collect();
        Value::Mapping(map)
    }

    /// Insert or replace a value. Replacing keeps the key's position.
    pub fn insert(&mut self, key: impl Into<String>, value: ConfigValue) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Entries in document order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConfigValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Decrypt every `Encrypted` entry.
    ///
    /// Decrypted values become `PendingEncryption`, or `Plain` when `plain`
    /// is set; with `plain`, existing `PendingEncryption` values are unwrapped
    /// too.
    ///
    /// # Errors
    ///
    /// Returns `ContextError` if an encrypted entry is present and a reserved
    /// key is missing, or `KmsError` if decryption fails.
    pub fn decrypt_all(&self, agent: &mut KeyAgent, plain: bool) -> Result<Self> {
        let mut out = Self::new();
        for (key, value) in &self.entries {
            let value = match value {
                ConfigValue::Encrypted(ciphertext) => {
                    let context = self.encryption_context(key)?;
                    debug!(key = %key, "decrypting value");
                    let plaintext = agent.decrypt(ciphertext, &context)?;
                    if plain {
                        ConfigValue::Plain(plaintext)
                    } else {
                        ConfigValue::PendingEncryption(plaintext)
                    }
                }
                ConfigValue::PendingEncryption(text) if plain => ConfigValue::Plain(text.clone()),
                other => other.clone(),
            };
            out.entries.push((key.clone(), value));
        }
        Ok(out)
    }

    /// Encrypt every `PendingEncryption` entry.
    ///
    /// `APP_NAME` and `STAGE_NAME` form the context of every other entry, so
    /// a pending reserved key is written out as `Plain` instead.
    ///
    /// # Errors
    ///
    /// Returns `ContextError` if a pending entry is present and a reserved key
    /// is missing, or `KmsError` if encryption fails.
    pub fn encrypt_all(&self, agent: &mut KeyAgent) -> Result<Self> {
        let mut out = Self::new();
        for (key, value) in &self.entries {
            let value = match value {
                ConfigValue::PendingEncryption(text) if is_reserved(key) => {
                    ConfigValue::Plain(text.clone())
                }
                ConfigValue::PendingEncryption(plaintext) => {
                    let context = self.encryption_context(key)?;
                    debug!(key = %key, "encrypting value");
                    ConfigValue::Encrypted(agent.encrypt(plaintext, &context)?)
                }
                other => other.clone(),
            };
            out.entries.push((key.clone(), value));
        }
        Ok(out)
    }

    /// Drop every `Encrypted` entry without decrypting it.
    ///
    /// With `plain`, `PendingEncryption` values are unwrapped to `Plain`.
    pub fn remove_encrypted(&self, plain: bool) -> Self {
        let entries = self
            .entries
            .iter()
            .filter(|(_, value)| !value.is_encrypted())
            .map(|(key, value)| {
                let value = match value {
                    ConfigValue::PendingEncryption(text) if plain => {
                        ConfigValue::Plain(text.clone())
                    }
                    other => other.clone(),
                };
                (key.clone(), value)
            })
            .collect();
        Self { entries }
    }

    /// Key/text pairs for output or process environments.
    pub fn plain_pairs(&self) -> Vec<(String, String)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.clone(), value.text().to_string()))
            .collect()
    }

    /// Encryption context for the entry named `key`.
    ///
    /// # Errors
    ///
    /// Returns `ContextError` if `APP_NAME` or `STAGE_NAME` is absent or
    /// itself encrypted.
    pub fn encryption_context(&self, key: &str) -> Result<EncryptionContext> {
        let app = self.reserved(APP_NAME)?;
        let stage = self.reserved(STAGE_NAME)?;
        Ok(EncryptionContext::for_entry(app, stage, key))
    }

    fn reserved(&self, name: &'static str) -> Result<&str> {
        match self.get(name) {
            Some(ConfigValue::Encrypted(_)) => Err(ContextError::EncryptedReservedKey(name).into()),
            Some(value) => Ok(value.text()),
            None => Err(ContextError::MissingReservedKey(name).into()),
        }
    }
}

impl<K: Into<String>> FromIterator<(K, ConfigValue)> for EnvironmentMapping {
    fn from_iter<I: IntoIterator<Item = (K, ConfigValue)>>(iter: I) -> Self {
        let mut mapping = Self::new();
        for (key, value) in iter {
            mapping.insert(key, value);
        }
        mapping
    }
}

fn is_reserved(key: &str) -> bool {
    key == APP_NAME || key == STAGE_NAME
}

fn describe(key: &Value) -> String {
    serde_yaml::to_string(key)
        .map(|s| s.trim_end().to_string())
        .unwrap_or_else(|_| format!("{:?}", key))
}
