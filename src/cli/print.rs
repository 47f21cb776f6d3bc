//! Print command.
//!
//! Prints every value, decrypted, as shell assignments or JSON. Keys are
//! sorted in every format.

use std::borrow::Cow;
use std::collections::BTreeMap;

use crate::cli::{load, output};
use crate::core::services::Services;
use crate::error::{DocumentError, Result};

/// How to render the values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Format {
    /// `export KEY=value;` instead of `KEY=value`.
    pub export: bool,
    /// Join with spaces; compact JSON.
    pub single_line: bool,
    pub json: bool,
}

pub fn execute(
    services: &mut Services,
    file: Option<&str>,
    ignore_missing: bool,
    only_unencrypted: bool,
    format: Format,
) -> Result<()> {
    let mapping = load::load_environment(services, file, ignore_missing)?;
    let plain = if only_unencrypted {
        mapping.remove_encrypted(true)
    } else {
        mapping.decrypt_all(&mut services.agent, true)?
    };

    let text = render(plain.plain_pairs(), format)?;
    output::raw(&text)?;
    Ok(())
}

/// Render key/value pairs, with a trailing newline.
pub fn render(pairs: Vec<(String, String)>, format: Format) -> Result<String> {
    let sorted: BTreeMap<String, String> = pairs.into_iter().collect();

    let mut text = if format.json {
        if format.single_line {
            serde_json::to_string(&sorted)
        } else {
            serde_json::to_string_pretty(&sorted)
        }
        .map_err(DocumentError::Json)?
    } else {
        let lines: Vec<String> = sorted
            .iter()
            .map(|(key, value)| {
                if format.export {
                    format!("export {}={};", key, shell_quote(value))
                } else {
                    format!("{}={}", key, shell_quote(value))
                }
            })
            .collect();
        lines.join(if format.single_line { " " } else { "\n" })
    };

    text.push('\n');
    Ok(text)
}

/// Quote a value for POSIX shells.
///
/// Strings made only of safe characters are returned as is; anything else is
/// single-quoted, with embedded `'` written as `'"'"'`.
pub fn shell_quote(value: &str) -> Cow<'_, str> {
    if value.is_empty() {
        return Cow::Borrowed("''");
    }
    if value.chars().all(is_safe) {
        return Cow::Borrowed(value);
    }
    Cow::Owned(format!("'{}'", value.replace('\'', r#"'"'"'"#)))
}

fn is_safe(c: char) -> bool {
    c.is_ascii_alphanumeric() || "_@%+=:,./-".contains(c)
}
