//! Encrypt-file command.
//!
//! Encrypts every `to_encrypt` value of a local file in place.

use std::path::Path;

use crate::cli::{load, output};
use crate::core::document;
use crate::core::kms::KeyAgent;
use crate::error::Result;

pub fn execute(agent: &mut KeyAgent, path: &Path) -> Result<()> {
    let encrypted = load::load_and_encrypt(path, agent)?;
    document::save(path, &encrypted)?;
    output::success(&format!("encrypted {}", output::path(&path.display().to_string())));
    Ok(())
}
