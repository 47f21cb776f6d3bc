//! Decrypt-file command.
//!
//! Rewrites every `encrypted` value of a local file as `to_encrypt`, so a
//! later `encrypt-file` restores it.

use std::path::Path;

use crate::cli::{load, output};
use crate::core::document;
use crate::core::kms::KeyAgent;
use crate::error::Result;

pub fn execute(agent: &mut KeyAgent, path: &Path) -> Result<()> {
    let decrypted = load::load_and_decrypt(path, agent)?;
    document::save(path, &decrypted)?;
    output::success(&format!("decrypted {}", output::path(&path.display().to_string())));
    Ok(())
}
