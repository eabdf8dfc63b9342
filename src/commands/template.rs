use std::fmt;

use log::debug;
use thiserror::Error;

use crate::commands::path::{is_path_like, normalize_path};
use crate::commands::workflow::Workflow;
use crate::substitution::{References, Scope, Unbound, extract_references, substitute};

/// Errors that can occur while building a command from a workflow
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("undefined variables: {} (use -s/--set to provide values)", .0.join(", "))]
    UndefinedVariables(Vec<String>),
}

/// A fully substituted argument vector: command, optional subcommand, then arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCommand(Vec<String>);

impl ResolvedCommand {
    #[must_use]
    pub fn program(&self) -> &str {
        &self.0[0]
    }

    /// Everything after the program name.
    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.0[1..]
    }

    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for ResolvedCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(" "))
    }
}

/// The two substitution namespaces of a build.
struct Scopes {
    /// Declared variables only, used for `{name}`.
    protected: Scope,
    /// Declared variables with overrides layered on top, used for `$name`.
    overridable: Scope,
}

impl Scopes {
    fn new(workflow: &Workflow, overrides: &Scope) -> Self {
        let protected = workflow.variables.clone();
        let mut overridable = protected.clone();
        overridable.extend(overrides.iter().map(|(k, v)| (k.clone(), v.clone())));
        Scopes {
            protected,
            overridable,
        }
    }

    /// Every reference in the arguments and in both scopes' values that lacks a binding.
    fn undefined(&self, args: &[String]) -> Vec<String> {
        let mut refs = References::default();
        let texts = args
            .iter()
            .chain(self.protected.values())
            .chain(self.overridable.values());
        for text in texts {
            refs.extend(extract_references(text));
        }

        let mut missing: Vec<String> = refs
            .braces
            .into_iter()
            .filter(|name| !self.protected.contains_key(name))
            .chain(
                refs.sigils
                    .into_iter()
                    .filter(|name| !self.overridable.contains_key(name)),
            )
            .collect();
        missing.sort();
        missing.dedup();
        missing
    }

    fn apply(&self, arg: &str) -> String {
        let substituted = substitute(
            arg,
            Some(&self.protected),
            &self.overridable,
            Unbound::Empty,
        );
        if is_path_like(&substituted) {
            normalize_path(&substituted)
        } else {
            substituted
        }
    }
}

/// Build the argument vector for a workflow, applying caller overrides.
///
/// # Errors
///
/// Returns `TemplateError::UndefinedVariables` listing every reference without a binding.
/// Nothing is substituted when validation fails.
pub fn build_command(
    workflow: &Workflow,
    overrides: &Scope,
) -> Result<ResolvedCommand, TemplateError> {
    let scopes = Scopes::new(workflow, overrides);

    let missing = scopes.undefined(&workflow.args);
    if !missing.is_empty() {
        return Err(TemplateError::UndefinedVariables(missing));
    }

    let mut cmd = Vec::with_capacity(workflow.args.len() + 2);
    cmd.push(workflow.command.clone());
    if let Some(subcommand) = workflow.subcommand.as_ref().filter(|s| !s.is_empty()) {
        cmd.push(subcommand.clone());
    }
    cmd.extend(workflow.args.iter().map(|arg| scopes.apply(arg)));

    let resolved = ResolvedCommand(cmd);
    debug!("Resolved workflow '{}' to: {resolved}", workflow.command);
    Ok(resolved)
}

/// Render a resolved command for display.
#[must_use]
pub fn format_command(cmd: &ResolvedCommand) -> String {
    cmd.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overrides(pairs: &[(&str, &str)]) -> Scope {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_build_with_subcommand() {
        let wf = Workflow::new("docker").with_subcommand("ps").with_args(["-a"]);
        let cmd = build_command(&wf, &Scope::new()).unwrap();
        assert_eq!(cmd.as_slice(), ["docker", "ps", "-a"]);
        assert_eq!(cmd.program(), "docker");
        assert_eq!(cmd.args(), ["ps", "-a"]);
    }

    #[test]
    fn test_build_without_subcommand() {
        let wf = Workflow::new("echo").with_args(["Hello", "World"]);
        let cmd = build_command(&wf, &Scope::new()).unwrap();
        assert_eq!(cmd.as_slice(), ["echo", "Hello", "World"]);
    }

    #[test]
    fn test_empty_subcommand_is_skipped() {
        let wf = Workflow::new("ls").with_subcommand("");
        let cmd = build_command(&wf, &Scope::new()).unwrap();
        assert_eq!(cmd.as_slice(), ["ls"]);
    }

    #[test]
    fn test_declared_variables_substituted() {
        let wf = Workflow::new("echo")
            .with_args(["Hello {name}!"])
            .with_variable("name", "Linea");
        let cmd = build_command(&wf, &Scope::new()).unwrap();
        assert_eq!(cmd.args(), ["Hello Linea!"]);
    }

    #[test]
    fn test_brace_syntax_ignores_overrides() {
        let wf = Workflow::new("echo")
            .with_args(["{n}"])
            .with_variable("n", "A");
        let cmd = build_command(&wf, &overrides(&[("n", "B")])).unwrap();
        assert_eq!(cmd.args(), ["A"]);
    }

    #[test]
    fn test_sigil_syntax_honors_overrides() {
        let wf = Workflow::new("echo")
            .with_args(["$n", "${n}"])
            .with_variable("n", "A");
        let cmd = build_command(&wf, &overrides(&[("n", "B")])).unwrap();
        assert_eq!(cmd.args(), ["B", "B"]);
    }

    #[test]
    fn test_override_only_binds_sigil_namespace() {
        let wf = Workflow::new("echo").with_args(["{only}"]);
        let err = build_command(&wf, &overrides(&[("only", "x")])).unwrap_err();
        assert_eq!(err, TemplateError::UndefinedVariables(vec!["only".to_string()]));

        let wf = Workflow::new("echo").with_args(["$only"]);
        let cmd = build_command(&wf, &overrides(&[("only", "x")])).unwrap();
        assert_eq!(cmd.args(), ["x"]);
    }

    #[test]
    fn test_undefined_variable_reported() {
        let wf = Workflow::new("echo").with_args(["{missing}"]);
        let err = build_command(&wf, &Scope::new()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "undefined variables: missing (use -s/--set to provide values)"
        );
    }

    #[test]
    fn test_undefined_variables_aggregated_and_sorted() {
        let wf = Workflow::new("echo")
            .with_args(["{zeta} $alpha", "{beta}"])
            .with_variable("greeting", "hi $gamma");
        let err = build_command(&wf, &Scope::new()).unwrap_err();
        assert_eq!(
            err,
            TemplateError::UndefinedVariables(vec![
                "alpha".to_string(),
                "beta".to_string(),
                "gamma".to_string(),
                "zeta".to_string(),
            ])
        );
    }

    #[test]
    fn test_references_inside_override_values_are_validated() {
        let wf = Workflow::new("echo").with_args(["$a"]);
        let err = build_command(&wf, &overrides(&[("a", "{nope}")])).unwrap_err();
        assert_eq!(err, TemplateError::UndefinedVariables(vec!["nope".to_string()]));
    }

    #[test]
    fn test_path_arguments_normalized_flags_preserved() {
        let wf = Workflow::new("tool")
            .with_args(["/?", "-v", "--help", "{dir}/../out/file.txt"])
            .with_variable("dir", "C:/Users/Test");
        let cmd = build_command(&wf, &Scope::new()).unwrap();
        assert_eq!(cmd.args()[0], "/?");
        assert_eq!(cmd.args()[1], "-v");
        assert_eq!(cmd.args()[2], "--help");
        assert_eq!(cmd.args()[3], normalize_path("C:/Users/out/file.txt"));
    }

    #[test]
    fn test_format_command() {
        let wf = Workflow::new("docker").with_subcommand("ps").with_args(["-a"]);
        let cmd = build_command(&wf, &Scope::new()).unwrap();
        assert_eq!(format_command(&cmd), "docker ps -a");
    }
}
