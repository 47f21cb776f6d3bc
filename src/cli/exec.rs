//! Exec command.
//!
//! Runs a command with every configuration value, decrypted, added to its
//! environment.

use std::process::{Command, ExitStatus};

use tracing::debug;
use zeroize::Zeroizing;

use crate::cli::load;
use crate::core::services::Services;
use crate::error::{Error, Result};

/// Run `command` and exit with its status.
pub fn execute(
    services: &mut Services,
    file: Option<&str>,
    ignore_missing: bool,
    command: &[String],
) -> Result<()> {
    let code = run(services, file, ignore_missing, command)?;
    std::process::exit(code);
}

/// Run `command` with the decrypted environment and return its exit code.
pub fn run(
    services: &mut Services,
    file: Option<&str>,
    ignore_missing: bool,
    command: &[String],
) -> Result<i32> {
    let command = match command.first() {
        Some(first) if first == "--" => &command[1..],
        _ => command,
    };
    let Some((program, args)) = command.split_first() else {
        return Err(Error::NoCommand);
    };

    let mapping = load::load_environment(services, file, ignore_missing)?;
    let decrypted = mapping.decrypt_all(&mut services.agent, true)?;

    // Wiped when dropped, after the child has exited.
    let env: Vec<(String, Zeroizing<String>)> = decrypted
        .plain_pairs()
        .into_iter()
        .map(|(key, value)| (key, Zeroizing::new(value)))
        .collect();

    debug!(program = %program, vars = env.len(), "running command");
    let mut cmd = Command::new(program);
    cmd.args(args);
    for (key, value) in &env {
        cmd.env(key, value.as_str());
    }

    let status = cmd.status().map_err(|source| Error::Spawn {
        program: program.clone(),
        source,
    })?;
    Ok(exit_code(status))
}

/// Exit code of a finished child; `128 + signal` if it was killed.
pub fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    1
}
