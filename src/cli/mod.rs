//! Command-line interface.

pub mod decrypt_file;
pub mod edit;
pub mod encrypt_file;
pub mod exec;
pub mod load;
pub mod output;
pub mod print;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::core::constants::KEY_ENV;
use crate::core::services::Services;
use crate::core::settings::Settings;

/// kmsenv - KMS-encrypted environment configuration.
#[derive(Parser)]
#[command(
    name = "kmsenv",
    about = "Manage KMS-encrypted environment configuration in YAML",
    version
)]
pub struct Cli {
    /// KMS key alias, ARN or ID used for encryption
    #[arg(short, long, global = true, env = KEY_ENV)]
    pub key: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Command {
    /// Encrypt a file's to_encrypt values in place
    EncryptFile {
        /// Path to the YAML file
        file: PathBuf,
    },

    /// Decrypt a file's encrypted values in place
    DecryptFile {
        /// Path to the YAML file
        file: PathBuf,
    },

    /// Decrypt a file temporarily, edit it with $EDITOR, then re-encrypt it
    Edit {
        /// Path to the YAML file
        file: PathBuf,
    },

    /// Run a command with the decrypted values in its environment
    Exec {
        /// File or s3:// locator to read instead of EC2 user data
        #[arg(short, long)]
        file: Option<String>,

        /// Don't fail if the EC2 user data is missing
        #[arg(short, long)]
        ignore_missing: bool,

        /// Command and arguments to run
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        command: Vec<String>,
    },

    /// Print the decrypted values
    Print {
        /// File or s3:// locator to read instead of EC2 user data
        #[arg(short, long)]
        file: Option<String>,

        /// Don't fail if the EC2 user data is missing
        #[arg(short, long)]
        ignore_missing: bool,

        /// Skip encrypted values instead of decrypting them
        #[arg(long)]
        only_unencrypted: bool,

        /// Print everything on one line
        #[arg(long)]
        single_line: bool,

        /// Print as `export KEY=value;` for sh
        #[arg(long, conflicts_with = "json")]
        export: bool,

        /// Print as a JSON object
        #[arg(long)]
        json: bool,
    },
}

/// Execute a command.
pub fn execute(command: Command, key: Option<String>) -> crate::error::Result<()> {
    use Command::*;

    let settings = Settings::resolve(key)?;
    let mut services = Services::aws(&settings);

    match command {
        EncryptFile { file } => encrypt_file::execute(&mut services.agent, &file),
        DecryptFile { file } => decrypt_file::execute(&mut services.agent, &file),
        Edit { file } => edit::execute(&mut services.agent, &file),
        Exec {
            file,
            ignore_missing,
            command,
        } => exec::execute(&mut services, file.as_deref(), ignore_missing, &command),
        Print {
            file,
            ignore_missing,
            only_unencrypted,
            single_line,
            export,
            json,
        } => print::execute(
            &mut services,
            file.as_deref(),
            ignore_missing,
            only_unencrypted,
            print::Format {
                export,
                single_line,
                json,
            },
        ),
    }
}
