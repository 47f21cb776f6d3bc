//! Encryption context.
//!
//! Authenticated data bound to every KMS ciphertext. Pairs are kept sorted by
//! key, so contexts compare and hash equal regardless of insertion order.

use std::collections::{BTreeMap, HashMap};

use crate::core::constants::{CONTEXT_APP, CONTEXT_KEY, CONTEXT_STAGE};

/// String pairs passed to KMS alongside every encrypt and decrypt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EncryptionContext(BTreeMap<String, String>);

impl EncryptionContext {
    /// Create an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Context binding a value to its application, stage and key name.
    pub fn for_entry(app: &str, stage: &str, key: &str) -> Self {
        [(CONTEXT_APP, app), (CONTEXT_STAGE, stage), (CONTEXT_KEY, key)]
            .into_iter()
            .collect()
    }

    /// Add or replace a pair.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Owned copy in the shape the AWS SDK expects.
    pub fn to_hash_map(&self) -> HashMap<String, String> {
        self.0.clone().into_iter().collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for EncryptionContext {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
