//! Process execution boundary.
//!
//! Every call blocks until the child exits. Standard streams are inherited and no timeout is
//! applied, so a hung child hangs the caller.

use std::io;
use std::process::{Command as ProcessCommand, ExitStatus};

use log::debug;
use thiserror::Error;

use crate::commands::template::ResolvedCommand;

#[derive(Error, Debug)]
pub enum ExecError {
    #[error("command is empty")]
    Empty,
    #[error("failed to start `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("`{program}` exited with {status}")]
    Failed { program: String, status: ExitStatus },
}

fn check_status(program: &str, status: ExitStatus) -> Result<(), ExecError> {
    if status.success() {
        Ok(())
    } else {
        Err(ExecError::Failed {
            program: program.to_string(),
            status,
        })
    }
}

/// Run a resolved command directly, without a shell.
///
/// On Windows a program that cannot be found is retried through `cmd.exe /c`, which covers
/// shell built-ins such as `echo` and `dir`.
///
/// # Errors
///
/// Returns `ExecError::Spawn` if the process cannot be started, or `ExecError::Failed` on a
/// non-zero exit.
pub fn execute(cmd: &ResolvedCommand) -> Result<(), ExecError> {
    let program = cmd.program();
    if program.is_empty() {
        return Err(ExecError::Empty);
    }
    debug!("Executing {cmd}");

    let status = match ProcessCommand::new(program).args(cmd.args()).status() {
        Ok(status) => status,
        Err(e) if cfg!(windows) && e.kind() == io::ErrorKind::NotFound => {
            debug!("`{program}` not found on PATH, retrying through cmd.exe");
            return execute_shell(&cmd.to_string());
        }
        Err(source) => {
            return Err(ExecError::Spawn {
                program: program.to_string(),
                source,
            });
        }
    };
    check_status(program, status)
}

/// The host shell and the flag that makes it run a command string.
#[must_use]
pub fn host_shell() -> (&'static str, &'static str) {
    if cfg!(windows) {
        ("cmd.exe", "/c")
    } else {
        ("sh", "-c")
    }
}

/// Run a command line through the host shell.
///
/// # Errors
///
/// Returns `ExecError::Spawn` if the shell cannot be started, or `ExecError::Failed` if the
/// command line exits non-zero.
pub fn execute_shell(line: &str) -> Result<(), ExecError> {
    if line.trim().is_empty() {
        return Err(ExecError::Empty);
    }
    let (shell, flag) = host_shell();
    debug!("Executing through {shell}: {line}");
    let status = ProcessCommand::new(shell)
        .arg(flag)
        .arg(line)
        .status()
        .map_err(|source| ExecError::Spawn {
            program: shell.to_string(),
            source,
        })?;
    check_status(shell, status)
}
