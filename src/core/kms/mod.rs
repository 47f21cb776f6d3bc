//! Key agent.
//!
//! Authenticated encrypt/decrypt through a key-management service, with a
//! cache so that decrypting and then re-encrypting an unchanged value yields
//! the original ciphertext without another round trip.
//!
//! - `aws`: the AWS KMS client
//! - `cache`: the (plaintext, context) → ciphertext memo

mod aws;
mod cache;

pub use aws::AwsKms;
pub use cache::CipherCache;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tracing::{debug, trace};

use crate::core::context::EncryptionContext;
use crate::error::{KmsError, Result};

/// Raw key-management service operations.
///
/// Implemented by [`AwsKms`] and by stubs in tests.
pub trait KmsClient {
    /// Encrypt `plaintext` under `key_id`, binding `context`.
    fn encrypt(
        &self,
        key_id: &str,
        plaintext: &[u8],
        context: &EncryptionContext,
    ) -> Result<Vec<u8>>;

    /// Decrypt `ciphertext`; fails unless `context` matches the one used to encrypt.
    fn decrypt(&self, ciphertext: &[u8], context: &EncryptionContext) -> Result<Vec<u8>>;
}

/// Encrypts and decrypts values with memoized round trips.
pub struct KeyAgent {
    client: Box<dyn KmsClient>,
    key_id: String,
    cache: CipherCache,
}

impl KeyAgent {
    /// Create an agent that encrypts under `key_id`.
    pub fn new(client: Box<dyn KmsClient>, key_id: impl Into<String>) -> Self {
        Self {
            client,
            key_id: key_id.into(),
            cache: CipherCache::new(),
        }
    }

    /// Decrypt a base64 ciphertext.
    ///
    /// Remembers the ciphertext so a later `encrypt` of the same plaintext and
    /// context returns it unchanged.
    ///
    /// # Errors
    ///
    /// Returns `KmsError` if the input is not base64, the service rejects the
    /// call, or the plaintext is not UTF-8.
    pub fn decrypt(&mut self, base64_ciphertext: &str, context: &EncryptionContext) -> Result<String> {
        // Folded or wrapped YAML scalars can leave whitespace inside the value.
        let compact: String = base64_ciphertext
            .chars()
            .filter(|c| !c.is_ascii_whitespace())
            .collect();
        let blob = STANDARD.decode(compact).map_err(KmsError::from)?;
        trace!(ciphertext_len = blob.len(), "decrypting");

        let bytes = self.client.decrypt(&blob, context)?;
        let plaintext = String::from_utf8(bytes).map_err(|_| KmsError::InvalidPlaintext)?;

        self.cache
            .insert(&plaintext, context, base64_ciphertext.to_string());
        Ok(plaintext)
    }

    /// Encrypt a plaintext, returning base64 ciphertext.
    ///
    /// # Errors
    ///
    /// Returns `KmsError` if the service rejects the call.
    pub fn encrypt(&mut self, plaintext: &str, context: &EncryptionContext) -> Result<String> {
        if let Some(cached) = self.cache.get(plaintext, context) {
            debug!("reusing cached ciphertext");
            return Ok(cached.to_string());
        }

        trace!(key_id = %self.key_id, plaintext_len = plaintext.len(), "encrypting");
        let blob = self
            .client
            .encrypt(&self.key_id, plaintext.as_bytes(), context)?;
        let encoded = STANDARD.encode(blob);

        self.cache.insert(plaintext, context, encoded.clone());
        Ok(encoded)
    }

    /// Number of cached ciphertexts.
    pub fn cached(&self) -> usize {
        self.cache.len()
    }

    /// Forget every cached ciphertext.
    pub fn reset(&mut self) {
        self.cache.clear();
    }
}
