//! The `lineash` script language.
//!
//! Scripts are interpreted line by line. Assignments, `if`/`for`/`while` blocks and
//! commands are recognized by the [`scanner`]; block boundaries are found by the pure
//! functions in [`blocks`]; the [`interpreter`] walks line ranges and hands commands to a
//! [`dispatch::Dispatcher`] once a [`resolver::VerbResolver`] has decided whether the verb
//! names a workflow.

use std::path::PathBuf;

use thiserror::Error;

use crate::config_file::ConfigError;
use crate::exec::ExecError;
use crate::runner::RunError;

pub mod blocks;
pub mod context;
pub mod dispatch;
pub mod eval;
pub mod interpreter;
pub mod resolver;
pub mod scanner;

pub use context::ScriptContext;
pub use dispatch::{Dispatcher, ProcessDispatcher};
pub use interpreter::{Interpreter, InterpreterOptions};
pub use resolver::{VerbResolver, WorkflowDirectory};

/// Failures of a workflow invoked as a script verb.
#[derive(Error, Debug)]
pub enum WorkflowError {
    #[error("workflow {0} not found")]
    Missing(String),
    #[error("failed to load workflow {name}: {source}")]
    Load {
        name: String,
        #[source]
        source: ConfigError,
    },
    #[error(transparent)]
    Run(#[from] RunError),
}

#[derive(Error, Debug)]
pub enum ScriptError {
    #[error("failed to read script {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not find .linea/workflows directory above {0}")]
    WorkflowsDirNotFound(PathBuf),
    #[error("error executing workflow at line {line}: {source}")]
    Workflow {
        line: usize,
        #[source]
        source: WorkflowError,
    },
    #[error("error executing command at line {line}: {source}")]
    Command {
        line: usize,
        #[source]
        source: ExecError,
    },
    #[error("script interrupted at line {line}")]
    Cancelled { line: usize },
}

impl ScriptError {
    /// The 1-based script line the error refers to, if any.
    #[must_use]
    pub fn line(&self) -> Option<usize> {
        match self {
            ScriptError::Workflow { line, .. }
            | ScriptError::Command { line, .. }
            | ScriptError::Cancelled { line } => Some(*line),
            ScriptError::Read { .. } | ScriptError::WorkflowsDirNotFound(_) => None,
        }
    }
}
