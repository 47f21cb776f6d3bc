//! Remote include resolution.
//!
//! A document may carry `include: s3://bucket/key?versionId=<v>`. The
//! referenced object is fetched and its top-level keys merged into the
//! document, overwriting keys of the same name. Inclusion is single level:
//! an `include` inside the fetched document is not followed.

use serde_yaml::Value;
use tracing::debug;

use crate::core::constants::INCLUDE_KEY;
use crate::core::document;
use crate::core::store::{ObjectStore, S3Location};
use crate::error::{IncludeError, Result};

/// Resolve the `include` key of `doc`, if any.
///
/// Documents that are not mappings are returned untouched.
///
/// # Errors
///
/// Returns `IncludeError` if the value is not a single string or the fetched
/// document is not a mapping, and `StoreError` if the locator is not a
/// versioned `s3://` URL or the fetch fails.
pub fn resolve(doc: Value, store: &dyn ObjectStore) -> Result<Value> {
    let mut base = match doc {
        Value::Mapping(base) => base,
        other => return Ok(other),
    };
    let Some(locator) = base.remove(INCLUDE_KEY) else {
        return Ok(Value::Mapping(base));
    };

    let locator = locator.as_str().ok_or(IncludeError::NotAString)?;
    let location = S3Location::parse_versioned(locator)?;
    debug!(location = %location, "including remote document");

    let fetched = document::parse(&location.fetch(store)?, locator)?;
    let Value::Mapping(fetched) = fetched else {
        return Err(IncludeError::NotAMapping(locator.to_string()).into());
    };

    for (key, value) in fetched {
        base.insert(key, value);
    }
    Ok(Value::Mapping(base))
}
