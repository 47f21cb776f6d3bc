//! kmsenv - KMS-encrypted environment configuration.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use kmsenv::cli::output;
use kmsenv::cli::{execute, Cli};
use kmsenv::core::constants::LOG_ENV;
use kmsenv::error::{ContextError, Error, KmsError, MetadataError};

fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("kmsenv=debug")
        } else {
            EnvFilter::new("kmsenv=warn")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    if let Err(e) = execute(cli.command, cli.key) {
        let cause = match &e {
            Error::EditKept { source, .. } => source.as_ref(),
            other => other,
        };
        let suggestion = match cause {
            Error::Metadata(MetadataError::Connect(_)) => {
                Some("pass -f FILE to read a local file instead")
            }
            Error::Metadata(MetadataError::NotFound(_)) => {
                Some("pass --ignore-missing to continue without user data")
            }
            Error::Context(ContextError::MissingReservedKey(_)) => {
                Some("add APP_NAME and STAGE_NAME to the document")
            }
            Error::Kms(KmsError::EncryptFailed(_) | KmsError::DecryptFailed(_)) => {
                Some("check your AWS credentials and the --key setting")
            }
            _ => None,
        };

        output::error(&e.to_string());
        if let Some(hint) = suggestion {
            output::hint(hint);
        }
        std::process::exit(1);
    }
}
