//! Human-readable description of a workflow file, as printed by `linea help`.

use std::collections::BTreeMap;
use std::fmt::Write;

use crate::commands::template::build_command;
use crate::commands::workflow::Workflow;
use crate::runner::RunError;
use crate::substitution::Scope;

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

fn describe_one(out: &mut String, workflow: &Workflow) {
    let _ = writeln!(out, "Command: {}", workflow.command);
    if let Some(subcommand) = &workflow.subcommand {
        let _ = writeln!(out, "Subcommand: {subcommand}");
    }
    if !workflow.args.is_empty() {
        let _ = writeln!(out, "Arguments: [{}]", workflow.args.join(" "));
    }
    if !workflow.variables.is_empty() {
        out.push_str("Variables:\n");
        let sorted: BTreeMap<_, _> = workflow.variables.iter().collect();
        for (key, value) in sorted {
            let _ = writeln!(out, "  {key}: {value}");
        }
    }
}

/// Describe every document, ending each with its fully rendered command.
///
/// # Errors
///
/// Returns the template error of the first document that cannot be built with its declared
/// variables alone, indexed when the file holds several documents.
pub fn describe(documents: &[Workflow]) -> Result<String, RunError> {
    let mut out = String::new();

    if let [workflow] = documents {
        describe_one(&mut out, workflow);
        let cmd = build_command(workflow, &Scope::new())?;
        let _ = writeln!(out, "\nFull command: {cmd}");
        return Ok(out);
    }

    let total = documents.len();
    let _ = writeln!(out, "Found {total} commands in YAML file:\n");
    for (i, workflow) in documents.iter().enumerate() {
        let index = i + 1;
        let _ = writeln!(out, "{RULE}\nCommand {index}/{total}:\n{RULE}");
        describe_one(&mut out, workflow);
        let cmd = build_command(workflow, &Scope::new())
            .map_err(|source| RunError::Build { index, source })?;
        let _ = writeln!(out, "Full command: {cmd}");
        if index < total {
            out.push('\n');
        }
    }
    Ok(out)
}
