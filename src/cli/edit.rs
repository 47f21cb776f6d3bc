//! Edit command.
//!
//! Decrypts a file into a private temp file, runs `$EDITOR` on it, then
//! re-encrypts the result over the original. Unchanged values keep their
//! original ciphertext because the key agent remembers what it decrypted.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, warn};

use crate::cli::exec::exit_code;
use crate::cli::{load, output};
use crate::core::constants::DEFAULT_EDITOR;
use crate::core::document;
use crate::core::kms::KeyAgent;
use crate::error::{Error, Result};

const FILE_NAME: &str = "edit.yml";

pub fn execute(agent: &mut KeyAgent, path: &Path) -> Result<()> {
    let editor = std::env::var("EDITOR")
        .ok()
        .filter(|e| !e.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_EDITOR.to_string());

    edit_with(agent, path, &editor)?;
    output::success(&format!("edited {}", output::path(&path.display().to_string())));
    Ok(())
}

/// Edit `path` with `editor`.
///
/// The file is left untouched if the editor exits non-zero or the edited
/// document fails to load or encrypt. In the latter case the temp file is
/// kept and its path returned in `Error::EditKept`.
pub fn edit_with(agent: &mut KeyAgent, path: &Path, editor: &str) -> Result<()> {
    let decrypted = load::load_and_decrypt(path, agent)?;

    let dir = tempfile::Builder::new().prefix("kmsenv-").tempdir()?;
    let temp = private_file(dir.path())?;
    document::save(&temp, &decrypted)?;

    debug!(editor = %editor, "launching editor");
    let status = Command::new(editor)
        .arg(&temp)
        .status()
        .map_err(|source| Error::Spawn {
            program: editor.to_string(),
            source,
        })?;
    if !status.success() {
        return Err(Error::EditorFailed(exit_code(status)));
    }

    let saved = load::load_and_encrypt(&temp, agent)
        .and_then(|encrypted| document::save(path, &encrypted));
    if let Err(source) = saved {
        let kept = dir.keep().join(FILE_NAME);
        warn!(path = %kept.display(), "keeping edited file");
        return Err(Error::EditKept {
            path: kept,
            source: Box::new(source),
        });
    }
    Ok(())
}

/// Create an empty file readable only by the owner.
fn private_file(dir: &Path) -> Result<PathBuf> {
    let path = dir.join(FILE_NAME);
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    options.open(&path)?;
    Ok(path)
}
