//! S3 object store.

use std::cell::OnceCell;
use std::rc::Rc;

use aws_sdk_s3::error::ProvideErrorMetadata;
use aws_sdk_s3::Client;
use tracing::debug;

use super::ObjectStore;
use crate::core::aws::AwsSession;
use crate::error::{Result, StoreError};

/// Amazon S3 backend. The client is created on first fetch.
pub struct S3Store {
    session: Rc<AwsSession>,
    client: OnceCell<Client>,
}

impl S3Store {
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

impl ObjectStore for S3Store {
    fn get_object(&self, bucket: &str, key: &str, version: Option<&str>) -> Result<Vec<u8>> {
        let client = self.client()?;
        debug!(bucket = %bucket, key = %key, version = ?version, "fetching S3 object");

        let fetch_error = |code: String| StoreError::Fetch {
            code,
            bucket: bucket.to_string(),
            key: key.to_string(),
            version: version.unwrap_or("latest").to_string(),
        };

        let bytes = self.session.block_on(async {
            let output = client
                .get_object()
                .bucket(bucket)
                .key(key)
                .set_version_id(version.map(str::to_string))
                .send()
                .await
                .map_err(|e| {
                    fetch_error(
                        e.as_service_error()
                            .and_then(|se| se.code())
                            .map(str::to_string)
                            .unwrap_or_else(|| e.to_string()),
                    )
                })?;

            let body = output
                .body
                .collect()
                .await
                .map_err(|e| fetch_error(e.to_string()))?;
            Ok::<_, StoreError>(body.into_bytes().to_vec())
        })??;
        Ok(bytes)
    }
}
