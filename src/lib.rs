//! Core implementation of Linea
//!
//! Linea runs command templates described in YAML workflow files. A workflow names a
//! command, its arguments and declared variables; arguments reference variables as
//! `{name}` (always the declared value) or `$name` (overridable from the command line).
//! The companion script language, lineash, adds variables, conditionals and loops on top,
//! and calls workflows by name as if they were commands.

use std::path::Path;

use log::{debug, info};

use crate::commands::workflow::Workflow;
use crate::config_file::ConfigError;

pub mod commands;
pub mod config_file;
pub mod describe;
pub mod exec;
pub mod logger;
pub mod messages;
pub mod runner;
pub mod scaffold;
pub mod script;
pub mod substitution;
pub mod theme;

/// Load every valid document of a workflow file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read or parsed, or holds no document with a
/// command.
pub fn load_workflows(path: &Path) -> Result<Vec<Workflow>, ConfigError> {
    debug!("Loading workflow file {}", path.display());
    let workflows = config_file::from_file(path)?;
    info!(
        "Loaded {} document(s) from {}",
        workflows.len(),
        path.display()
    );
    Ok(workflows)
}
