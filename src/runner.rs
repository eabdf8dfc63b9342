use std::time::Instant;

use log::{debug, warn};
use thiserror::Error;

use crate::commands::template::{ResolvedCommand, TemplateError, build_command};
use crate::commands::workflow::Workflow;
use crate::exec::{self, ExecError};
use crate::messages::Painter;
use crate::substitution::Scope;

#[derive(Error, Debug)]
pub enum RunError {
    #[error(transparent)]
    Template(#[from] TemplateError),
    #[error("command execution failed: {0}")]
    Exec(#[from] ExecError),
    #[error("error building command {index}: {source}")]
    Build {
        index: usize,
        #[source]
        source: TemplateError,
    },
    #[error("command {index} execution failed: {source}")]
    Step {
        index: usize,
        #[source]
        source: ExecError,
    },
    #[error("{failed} of {total} commands failed")]
    Incomplete { failed: usize, total: usize },
}

/// How a workflow file should be driven.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Print each command before running it.
    pub verbose: bool,
    /// Report a failing document and move on to the next one.
    pub keep_going: bool,
    /// Print the commands instead of running them.
    pub dry_run: bool,
}

/// Outcome of driving every document in a file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunReport {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
}

impl RunReport {
    #[must_use]
    pub fn success(&self) -> bool {
        self.failed == 0
    }

    /// Turn a report with failures into `RunError::Incomplete`.
    ///
    /// # Errors
    ///
    /// Returns `RunError::Incomplete` if any document failed.
    pub fn into_result(self) -> Result<Self, RunError> {
        if self.success() {
            Ok(self)
        } else {
            Err(RunError::Incomplete {
                failed: self.failed,
                total: self.total,
            })
        }
    }
}

/// Build and run every document in order.
///
/// # Errors
///
/// See [`run_documents_with`].
pub fn run_documents(
    documents: &[Workflow],
    overrides: &Scope,
    options: RunOptions,
) -> Result<RunReport, RunError> {
    run_documents_with(documents, overrides, options, exec::execute)
}

/// Build every document and hand each resolved command to `execute`.
///
/// A single document fails with the bare template or execution error. With several
/// documents errors carry the 1-based document index, and `keep_going` turns them into
/// a reported failure instead of an early return.
///
/// # Errors
///
/// Returns the first build or execution failure unless `keep_going` is set.
pub fn run_documents_with<F>(
    documents: &[Workflow],
    overrides: &Scope,
    options: RunOptions,
    mut execute: F,
) -> Result<RunReport, RunError>
where
    F: FnMut(&ResolvedCommand) -> Result<(), ExecError>,
{
    let out = Painter::stdout();
    let total = documents.len();
    let mut report = RunReport {
        total,
        ..Default::default()
    };

    if let [workflow] = documents {
        let cmd = build_command(workflow, overrides)?;
        if options.dry_run {
            println!("{}", out.dry_run_message(&cmd.to_string()));
        } else {
            if options.verbose {
                println!("{}", out.start_message(&cmd.to_string()));
            }
            execute(&cmd)?;
        }
        report.passed = 1;
        return Ok(report);
    }

    if options.verbose || options.dry_run {
        println!("Found {total} commands in YAML file");
    }
    let start = Instant::now();

    for (i, workflow) in documents.iter().enumerate() {
        let index = i + 1;
        if options.verbose || options.dry_run {
            print!("{} ", out.step_prefix(index, total));
        }

        let cmd = match build_command(workflow, overrides) {
            Ok(cmd) => cmd,
            Err(source) if options.keep_going && !options.dry_run => {
                eprintln!("Error building command {index}: {source}");
                report.failed += 1;
                continue;
            }
            Err(source) => return Err(RunError::Build { index, source }),
        };

        if options.dry_run {
            println!("{}", out.dry_run_message(&cmd.to_string()));
            report.passed += 1;
            continue;
        }

        if options.verbose {
            println!("{}", out.start_message(&cmd.to_string()));
        }
        match execute(&cmd) {
            Ok(()) => report.passed += 1,
            Err(source) if options.keep_going => {
                warn!("Command {index} failed, continuing: {source}");
                eprintln!("Error executing command {index}: {source}");
                report.failed += 1;
            }
            Err(source) => return Err(RunError::Step { index, source }),
        }
    }

    debug!(
        "Ran {total} documents: {} passed, {} failed",
        report.passed, report.failed
    );
    if options.verbose || options.keep_going {
        let err = Painter::stderr();
        eprintln!(
            "{}",
            err.summary(report.passed, report.failed, total, start.elapsed())
        );
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(arg: &str) -> Workflow {
        Workflow::new("echo").with_args([arg])
    }

    fn record(
        documents: &[Workflow],
        overrides: &Scope,
        options: RunOptions,
        fail_on: Option<&str>,
    ) -> (Result<RunReport, RunError>, Vec<String>) {
        let mut seen = Vec::new();
        let result = run_documents_with(documents, overrides, options, |cmd| {
            seen.push(cmd.to_string());
            if fail_on.is_some_and(|f| cmd.args().iter().any(|a| a == f)) {
                Err(ExecError::Empty)
            } else {
                Ok(())
            }
        });
        (result, seen)
    }

    #[test]
    fn test_single_document_runs_once() {
        let (result, seen) = record(&[doc("hi")], &Scope::new(), RunOptions::default(), None);
        assert_eq!(result.unwrap(), RunReport { total: 1, passed: 1, failed: 0 });
        assert_eq!(seen, vec!["echo hi"]);
    }

    #[test]
    fn test_single_document_undefined_is_bare_template_error() {
        let (result, seen) = record(&[doc("{x}")], &Scope::new(), RunOptions::default(), None);
        assert!(matches!(result, Err(RunError::Template(_))));
        assert!(seen.is_empty());
    }

    #[test]
    fn test_multi_document_stops_on_first_failure() {
        let docs = [doc("one"), doc("two"), doc("three")];
        let (result, seen) = record(&docs, &Scope::new(), RunOptions::default(), Some("two"));
        match result {
            Err(RunError::Step { index, .. }) => assert_eq!(index, 2),
            other => panic!("Expected Step error, got: {other:?}"),
        }
        assert_eq!(seen, vec!["echo one", "echo two"]);
    }

    #[test]
    fn test_multi_document_build_error_carries_index() {
        let docs = [doc("one"), doc("{missing}")];
        let (result, _) = record(&docs, &Scope::new(), RunOptions::default(), None);
        let err = result.unwrap_err();
        assert!(err.to_string().starts_with("error building command 2: undefined variables: missing"));
    }

    #[test]
    fn test_keep_going_continues_past_failures() {
        let docs = [doc("one"), doc("{missing}"), doc("bad"), doc("four")];
        let options = RunOptions {
            keep_going: true,
            ..Default::default()
        };
        let (result, seen) = record(&docs, &Scope::new(), options, Some("bad"));
        let report = result.unwrap();
        assert_eq!(report, RunReport { total: 4, passed: 2, failed: 2 });
        assert!(!report.success());
        assert_eq!(
            report.into_result().unwrap_err().to_string(),
            "2 of 4 commands failed"
        );
        assert_eq!(seen, vec!["echo one", "echo bad", "echo four"]);
    }

    #[test]
    fn test_dry_run_never_executes() {
        let docs = [doc("one"), doc("two")];
        let options = RunOptions {
            dry_run: true,
            ..Default::default()
        };
        let (result, seen) = record(&docs, &Scope::new(), options, None);
        assert_eq!(result.unwrap().passed, 2);
        assert!(seen.is_empty());
    }

    #[test]
    fn test_overrides_apply_to_every_document() {
        let docs = [doc("$who"), doc("hello $who")];
        let overrides: Scope = [("who".to_string(), "linea".to_string())].into();
        let docs: Vec<Workflow> = docs
            .into_iter()
            .map(|d| d.with_variable("who", "default"))
            .collect();
        let (result, seen) = record(&docs, &overrides, RunOptions::default(), None);
        assert!(result.is_ok());
        assert_eq!(seen, vec!["echo linea", "echo hello linea"]);
    }
}
