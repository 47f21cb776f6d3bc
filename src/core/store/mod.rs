//! Object store access.
//!
//! Documents can live in S3 and be referenced as
//! `s3://bucket/key?versionId=<version>`.

mod s3;

pub use s3::S3Store;

use percent_encoding::percent_decode_str;
use url::Url;

use crate::error::{Result, StoreError};

/// Fetches object bytes from a remote store.
pub trait ObjectStore {
    /// Fetch `key` from `bucket`; `None` for the version means latest.
    fn get_object(&self, bucket: &str, key: &str, version: Option<&str>) -> Result<Vec<u8>>;
}

/// A parsed `s3://` locator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct S3Location {
    pub bucket: String,
    pub key: String,
    pub version: Option<String>,
}

impl S3Location {
    /// Whether `locator` names an S3 object rather than a local path.
    pub fn is_s3(locator: &str) -> bool {
        locator
            .get(..5)
            .is_some_and(|scheme| scheme.eq_ignore_ascii_case("s3://"))
    }

    /// Parse a locator; `versionId` is optional.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the locator is not a well-formed `s3://` URL.
    pub fn parse(locator: &str) -> Result<Self> {
        let url = Url::parse(locator).map_err(|e| {
            if e == url::ParseError::RelativeUrlWithoutBase {
                StoreError::UnsupportedScheme(String::new())
            } else {
                StoreError::InvalidUrl {
                    url: locator.to_string(),
                    reason: e.to_string(),
                }
            }
        })?;

        if url.scheme() != "s3" {
            return Err(StoreError::UnsupportedScheme(url.scheme().to_string()).into());
        }

        let bucket = url
            .host_str()
            .filter(|b| !b.is_empty())
            .ok_or_else(|| StoreError::InvalidUrl {
                url: locator.to_string(),
                reason: "missing bucket".into(),
            })?
            .to_string();

        // `Url` percent-encodes the path; S3 keys are raw.
        let key = percent_decode_str(url.path().trim_start_matches('/'))
            .decode_utf8()
            .map_err(|e| StoreError::InvalidUrl {
                url: locator.to_string(),
                reason: e.to_string(),
            })?
            .into_owned();
        if key.is_empty() {
            return Err(StoreError::InvalidUrl {
                url: locator.to_string(),
                reason: "missing key".into(),
            }
            .into());
        }

        let version = url
            .query_pairs()
            .find(|(name, _)| name == "versionId")
            .map(|(_, value)| value.into_owned());

        Ok(Self {
            bucket,
            key,
            version,
        })
    }

    /// Parse a locator that must pin an object version.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::MissingVersion` when `versionId` is absent.
    pub fn parse_versioned(locator: &str) -> Result<Self> {
        let location = Self::parse(locator)?;
        if location.version.is_none() {
            return Err(StoreError::MissingVersion(locator.to_string()).into());
        }
        Ok(location)
    }

    /// Fetch the object from `store`.
    pub fn fetch(&self, store: &dyn ObjectStore) -> Result<Vec<u8>> {
        store.get_object(&self.bucket, &self.key, self.version.as_deref())
    }
}

impl std::fmt::Display for S3Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "s3://{}/{}", self.bucket, self.key)?;
        if let Some(version) = &self.version {
            write!(f, "?versionId={}", version)?;
        }
        Ok(())
    }
}
