//! AWS KMS client.
//!
//! The SDK client is created once, on the first encrypt or decrypt, from the
//! shared [`AwsSession`]. Decrypt never names a key: KMS reads it from the
//! ciphertext blob.

use std::cell::OnceCell;
use std::rc::Rc;

use aws_sdk_kms::error::DisplayErrorContext;
use aws_sdk_kms::primitives::Blob;
use aws_sdk_kms::Client;
use tracing::trace;

use super::KmsClient;
use crate::core::aws::AwsSession;
use crate::core::context::EncryptionContext;
use crate::error::{KmsError, Result};

/// AWS Key Management Service backend.
pub struct AwsKms {
    session: Rc<AwsSession>,
    client: OnceCell<Client>,
}

impl AwsKms {
    pub fn new(session: Rc<AwsSession>) -> Self {
        Self {
            session,
            client: OnceCell::new(),
        }
    }

    fn client(&self) -> Result<&Client> {
        if let Some(client) = self.client.get() {
            return Ok(client);
        }
        let client = Client::new(self.session.config()?);
        Ok(self.client.get_or_init(|| client))
    }
}

impl KmsClient for AwsKms {
    fn encrypt(
        &self,
        key_id: &str,
        plaintext: &[u8],
        context: &EncryptionContext,
    ) -> Result<Vec<u8>> {
        let client = self.client()?;
        trace!(key_id = %key_id, context_pairs = context.len(), "KMS encrypt");

        let output = self.session.block_on(
            client
                .encrypt()
                .key_id(key_id)
                .plaintext(Blob::new(plaintext))
                .set_encryption_context(Some(context.to_hash_map()))
                .send(),
        )?;
        let output =
            output.map_err(|e| KmsError::EncryptFailed(DisplayErrorContext(&e).to_string()))?;

        let blob = output
            .ciphertext_blob()
            .ok_or_else(|| KmsError::EncryptFailed("no ciphertext returned".into()))?;
        Ok(blob.as_ref().to_vec())
    }

    fn decrypt(&self, ciphertext: &[u8], context: &EncryptionContext) -> Result<Vec<u8>> {
        let client = self.client()?;
        trace!(context_pairs = context.len(), "KMS decrypt");

        let output = self.session.block_on(
            client
                .decrypt()
                .ciphertext_blob(Blob::new(ciphertext))
                .set_encryption_context(Some(context.to_hash_map()))
                .send(),
        )?;
        let output =
            output.map_err(|e| KmsError::DecryptFailed(DisplayErrorContext(&e).to_string()))?;

        let blob = output
            .plaintext()
            .ok_or_else(|| KmsError::DecryptFailed("no plaintext returned".into()))?;
        Ok(blob.as_ref().to_vec())
    }
}
