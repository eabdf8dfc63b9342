use log::{debug, warn};

use crate::commands::overrides::parse_overrides;
use crate::commands::workflow::Workflow;
use crate::exec::{self, ExecError};
use crate::runner::{self, RunError, RunOptions};
use crate::substitution::Scope;

/// Where script commands end up once the verb has been resolved.
pub trait Dispatcher {
    /// Run a workflow's documents with the arguments that followed the verb.
    ///
    /// # Errors
    ///
    /// Returns `RunError` if a document cannot be built or its command fails.
    fn run_workflow(
        &mut self,
        verb: &str,
        documents: &[Workflow],
        args: &[String],
    ) -> Result<(), RunError>;

    /// Run an expanded line through the host shell.
    ///
    /// # Errors
    ///
    /// Returns `ExecError` if the shell cannot start or the line exits non-zero.
    fn run_system(&mut self, line: &str) -> Result<(), ExecError>;
}

/// Runs workflows in-process, the same way `linea run` does, and system commands through
/// the host shell.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessDispatcher;

/// Split workflow verb arguments into overrides and run options.
///
/// Accepts the `linea run` flags: `-s`/`--set`/`--args` pairs, `-v`/`--verbose` and
/// `--keep-going`. Anything else is ignored with a warning.
#[must_use]
pub fn workflow_options(verb: &str, args: &[String]) -> (Scope, RunOptions) {
    let (overrides, rest) = parse_overrides(args);
    let mut options = RunOptions::default();
    for arg in rest {
        match arg.as_str() {
            "-v" | "--verbose" => options.verbose = true,
            "--keep-going" => options.keep_going = true,
            other => warn!("Ignoring argument `{other}` for workflow {verb}"),
        }
    }
    (overrides, options)
}

impl Dispatcher for ProcessDispatcher {
    fn run_workflow(
        &mut self,
        verb: &str,
        documents: &[Workflow],
        args: &[String],
    ) -> Result<(), RunError> {
        let (overrides, options) = workflow_options(verb, args);
        debug!(
            "Running workflow {verb} ({} documents, {} overrides)",
            documents.len(),
            overrides.len()
        );
        runner::run_documents(documents, &overrides, options)?.into_result()?;
        Ok(())
    }

    fn run_system(&mut self, line: &str) -> Result<(), ExecError> {
        exec::execute_shell(line)
    }
}
