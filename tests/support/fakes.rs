//! In-memory stand-ins for KMS, S3 and the metadata service.

use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use kmsenv::core::context::EncryptionContext;
use kmsenv::core::kms::{KeyAgent, KmsClient};
use kmsenv::core::metadata::MetadataSource;
use kmsenv::core::services::Services;
use kmsenv::core::store::ObjectStore;
use kmsenv::error::{KmsError, MetadataError, Result, StoreError};

/// Reversible fake KMS.
///
/// Ciphertext is `<context>|<plaintext>`; decryption fails unless the
/// context matches, the way real KMS rejects a mismatched context.
#[derive(Default)]
pub struct FakeKms {
    pub calls: Rc<Cell<usize>>,
}

impl FakeKms {
    pub fn new() -> Self {
        Self::default()
    }
}

fn context_tag(context: &EncryptionContext) -> String {
    context
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join(",")
}

/// Base64 ciphertext `FakeKms` decrypts to `plaintext` for this entry.
pub fn fake_ciphertext(app: &str, stage: &str, key: &str, plaintext: &str) -> String {
    let context = EncryptionContext::for_entry(app, stage, key);
    STANDARD.encode(format!("{}|{}", context_tag(&context), plaintext))
}

impl KmsClient for FakeKms {
    fn encrypt(
        &self,
        _key_id: &str,
        plaintext: &[u8],
        context: &EncryptionContext,
    ) -> Result<Vec<u8>> {
        self.calls.set(self.calls.get() + 1);
        let mut blob = format!("{}|", context_tag(context)).into_bytes();
        blob.extend_from_slice(plaintext);
        Ok(blob)
    }

    fn decrypt(&self, ciphertext: &[u8], context: &EncryptionContext) -> Result<Vec<u8>> {
        self.calls.set(self.calls.get() + 1);
        let tag = format!("{}|", context_tag(context));
        match ciphertext.strip_prefix(tag.as_bytes()) {
            Some(plaintext) => Ok(plaintext.to_vec()),
            None => Err(KmsError::DecryptFailed("InvalidCiphertextException".into()).into()),
        }
    }
}

/// Fake object store keyed by (bucket, key, version).
#[derive(Default)]
pub struct FakeStore {
    objects: HashMap<(String, String, Option<String>), Vec<u8>>,
}

impl FakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, bucket: &str, key: &str, version: Option<&str>, body: &str) -> Self {
        self.objects.insert(
            (bucket.into(), key.into(), version.map(str::to_string)),
            body.as_bytes().to_vec(),
        );
        self
    }
}

impl ObjectStore for FakeStore {
    fn get_object(&self, bucket: &str, key: &str, version: Option<&str>) -> Result<Vec<u8>> {
        self.objects
            .get(&(bucket.into(), key.into(), version.map(str::to_string)))
            .cloned()
            .ok_or_else(|| {
                StoreError::Fetch {
                    code: "NoSuchKey".into(),
                    bucket: bucket.into(),
                    key: key.into(),
                    version: version.unwrap_or("latest").into(),
                }
                .into()
            })
    }
}

/// Fake metadata service; `None` user data behaves like a 404.
pub struct FakeMetadata {
    pub user_data: Option<String>,
}

impl MetadataSource for FakeMetadata {
    fn user_data(&self) -> std::result::Result<String, MetadataError> {
        self.user_data
            .clone()
            .ok_or(MetadataError::NotFound("user data"))
    }

    fn region(&self) -> std::result::Result<String, MetadataError> {
        Ok("eu-west-1".into())
    }
}

/// Services wired to fakes. Returns the KMS call counter.
pub fn fake_services(store: FakeStore, user_data: Option<&str>) -> (Services, Rc<Cell<usize>>) {
    let kms = FakeKms::new();
    let calls = Rc::clone(&kms.calls);
    let services = Services::new(
        KeyAgent::new(Box::new(kms), "alias/kmsenv"),
        Box::new(store),
        Box::new(FakeMetadata {
            user_data: user_data.map(str::to_string),
        }),
    );
    (services, calls)
}
