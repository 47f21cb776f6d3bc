//! Ciphertext cache.

use std::collections::HashMap;

use crate::core::context::EncryptionContext;

/// Maps (plaintext, context) to the base64 ciphertext last seen for it.
///
/// Lives as long as its owning agent and is never persisted.
#[derive(Debug, Default)]
pub struct CipherCache {
    entries: HashMap<(String, EncryptionContext), String>,
}

impl CipherCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, plaintext: &str, context: &EncryptionContext) -> Option<&str> {
        // Keyed by owned pairs, so the lookup key is built per call.
        self.entries
            .get(&(plaintext.to_string(), context.clone()))
            .map(String::as_str)
    }

    pub fn insert(&mut self, plaintext: &str, context: &EncryptionContext, ciphertext: String) {
        self.entries
            .insert((plaintext.to_string(), context.clone()), ciphertext);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
