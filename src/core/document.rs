//! Document I/O.
//!
//! Reads YAML documents from local files or S3 and writes them back to local
//! files. Documents are handled as raw YAML values here; typed conversion
//! happens in [`crate::core::mapping`].

use std::io::ErrorKind;
use std::path::Path;

use serde_yaml::Value;
use tracing::debug;

use crate::core::store::{ObjectStore, S3Location};
use crate::error::{DocumentError, Result};

/// Parse YAML bytes; `origin` names the source in error messages.
///
/// # Errors
///
/// Returns `DocumentError::Parse` if the bytes are not valid YAML.
pub fn parse(bytes: &[u8], origin: &str) -> Result<Value> {
    serde_yaml::from_slice(bytes).map_err(|source| {
        DocumentError::Parse {
            origin: origin.to_string(),
            source,
        }
        .into()
    })
}

/// Load a document from a local path or an `s3://` locator.
///
/// S3 locators may omit `versionId`, in which case the latest version is read.
///
/// # Errors
///
/// Returns `DocumentError::NotFound` for a missing local file, `StoreError`
/// for S3 failures, or `DocumentError::Parse` for invalid YAML.
pub fn load(locator: &str, store: &dyn ObjectStore) -> Result<Value> {
    if S3Location::is_s3(locator) {
        let location = S3Location::parse(locator)?;
        let bytes = location.fetch(store)?;
        return parse(&bytes, locator);
    }
    load_file(locator)
}

/// Load a document from a local file.
///
/// # Errors
///
/// Returns `DocumentError::NotFound` if the file does not exist.
pub fn load_file(path: impl AsRef<Path>) -> Result<Value> {
    let path = path.as_ref();
    debug!(path = %path.display(), "loading document");

    let bytes = std::fs::read(path).map_err(|source| {
        if source.kind() == ErrorKind::NotFound {
            DocumentError::NotFound(path.to_path_buf())
        } else {
            DocumentError::Read {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    parse(&bytes, &path.display().to_string())
}

/// Serialize a document to YAML text.
///
/// # Errors
///
/// Returns `DocumentError::Serialize` if serialization fails.
pub fn to_string(doc: &Value) -> Result<String> {
    serde_yaml::to_string(doc).map_err(|e| DocumentError::Serialize(e).into())
}

/// Write a document to a local file, replacing its contents.
///
/// # Errors
///
/// Returns `DocumentError::Write` if the file cannot be written.
pub fn save(path: impl AsRef<Path>, doc: &Value) -> Result<()> {
    let path = path.as_ref();
    debug!(path = %path.display(), "saving document");

    let contents = to_string(doc)?;
    std::fs::write(path, contents).map_err(|source| {
        DocumentError::Write {
            path: path.to_path_buf(),
            source,
        }
        .into()
    })
}
