//! Document loading shared by the commands.

use std::path::Path;

use serde_yaml::Value;
use tracing::debug;

use crate::core::document;
use crate::core::include;
use crate::core::kms::KeyAgent;
use crate::core::mapping::EnvironmentMapping;
use crate::core::metadata;
use crate::core::services::Services;
use crate::error::Result;

/// Load a local file and decrypt it to `to_encrypt` form.
pub fn load_and_decrypt(path: &Path, agent: &mut KeyAgent) -> Result<Value> {
    let doc = document::load_file(path)?;
    let mapping = EnvironmentMapping::from_document(&doc)?;
    Ok(mapping.decrypt_all(agent, false)?.to_document())
}

/// Load a local file and encrypt its pending values.
pub fn load_and_encrypt(path: &Path, agent: &mut KeyAgent) -> Result<Value> {
    let doc = document::load_file(path)?;
    let mapping = EnvironmentMapping::from_document(&doc)?;
    Ok(mapping.encrypt_all(agent)?.to_document())
}

/// Load the document for `exec` and `print`, with its include merged.
///
/// Reads `file` (a path or `s3://` locator) when given, the instance user
/// data otherwise.
pub fn load_environment(
    services: &Services,
    file: Option<&str>,
    ignore_missing: bool,
) -> Result<EnvironmentMapping> {
    let doc = match file {
        Some(locator) => document::load(locator, services.store.as_ref())?,
        None => {
            debug!("reading document from instance user data");
            metadata::load_user_data(services.metadata.as_ref(), ignore_missing)?
        }
    };
    let doc = include::resolve(doc, services.store.as_ref())?;
    EnvironmentMapping::from_document(&doc)
}
