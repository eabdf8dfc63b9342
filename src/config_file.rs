//! Workflow file handling for Linea

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde::Deserialize;
use thiserror::Error;

use crate::commands::workflow::Workflow;

/// Errors that can occur while loading workflow files
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse YAML document in {path}: {source}")]
    Yaml {
        source: serde_yaml::Error,
        path: PathBuf,
    },
    #[error("failed to parse JSON workflow {path}: {source}")]
    Json {
        source: serde_json::Error,
        path: PathBuf,
    },
    #[error("command field is required")]
    MissingCommand,
    #[error("no valid commands found in YAML file {0}")]
    NoValidDocuments(PathBuf),
}

/// A scalar JSON value accepted wherever a string is expected.
///
/// YAML scalars are read as their literal text instead, so `3.10` stays `3.10`.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum Scalar {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::String(s) => f.write_str(s),
            Scalar::Integer(i) => write!(f, "{i}"),
            Scalar::Float(x) => write!(f, "{x}"),
            Scalar::Bool(b) => write!(f, "{b}"),
        }
    }
}

/// On-disk form of a single workflow document, generic over how scalar values are read
#[derive(Debug, Deserialize, Default)]
pub struct ConfigWorkflow<V = String> {
    pub command: Option<String>,
    pub subcommand: Option<String>,
    pub args: Option<Vec<V>>,
    pub variables: Option<HashMap<String, Option<V>>>,
}

impl<V: fmt::Display> TryFrom<ConfigWorkflow<V>> for Workflow {
    type Error = ConfigError;

    fn try_from(config: ConfigWorkflow<V>) -> Result<Self, Self::Error> {
        let command = config
            .command
            .filter(|c| !c.trim().is_empty())
            .ok_or(ConfigError::MissingCommand)?;
        Ok(Workflow {
            command,
            subcommand: config.subcommand.filter(|s| !s.is_empty()),
            args: config
                .args
                .unwrap_or_default()
                .iter()
                .map(ToString::to_string)
                .collect(),
            variables: config
                .variables
                .unwrap_or_default()
                .into_iter()
                .map(|(k, v)| (k, v.map(|v| v.to_string()).unwrap_or_default()))
                .collect(),
        })
    }
}

/// Parse every `---`-separated document in `contents`.
///
/// Documents without a command are skipped with a warning; empty documents are ignored.
///
/// # Errors
///
/// Returns `ConfigError::Yaml` if any document is not valid YAML, or
/// `ConfigError::NoValidDocuments` if nothing usable remains.
pub fn parse_documents(contents: &str, path: &Path) -> Result<Vec<Workflow>, ConfigError> {
    let yaml_err = |source: serde_yaml::Error| ConfigError::Yaml {
        source,
        path: path.to_path_buf(),
    };

    let mut workflows = Vec::new();
    for (index, document) in serde_yaml::Deserializer::from_str(contents).enumerate() {
        let Some(config) = Option::<ConfigWorkflow>::deserialize(document).map_err(yaml_err)?
        else {
            continue;
        };
        match Workflow::try_from(config) {
            Ok(workflow) => workflows.push(workflow),
            Err(e) => warn!(
                "Skipping document {} in {}: {e}",
                index + 1,
                path.display()
            ),
        }
    }

    if workflows.is_empty() {
        return Err(ConfigError::NoValidDocuments(path.to_path_buf()));
    }
    Ok(workflows)
}

/// Load a workflow file. `.json` files hold a single document; anything else is YAML.
///
/// # Errors
///
/// Returns `ConfigError::Read` if the file cannot be read, a parse error for malformed
/// content, or `ConfigError::NoValidDocuments` if no document has a command.
pub fn from_file(file: &Path) -> Result<Vec<Workflow>, ConfigError> {
    let contents = std::fs::read_to_string(file).map_err(|source| ConfigError::Read {
        path: file.to_path_buf(),
        source,
    })?;
    debug!("Parsing workflow file {}", file.display());

    if file.extension().is_some_and(|ext| ext == "json") {
        let config: ConfigWorkflow<Scalar> =
            serde_json::from_str(&contents).map_err(|e| ConfigError::Json {
                source: e,
                path: file.to_path_buf(),
            })?;
        return Workflow::try_from(config)
            .map(|workflow| vec![workflow])
            .map_err(|_| ConfigError::NoValidDocuments(file.to_path_buf()));
    }

    parse_documents(&contents, file)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(contents: &str) -> Result<Vec<Workflow>, ConfigError> {
        parse_documents(contents, Path::new("test.yml"))
    }

    #[test]
    fn test_parse_single_document() {
        let docs = parse(
            "command: echo\nargs:\n  - \"Hello, World\"\nvariables:\n  name: \"Test\"\n",
        )
        .unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].command, "echo");
        assert_eq!(docs[0].args, vec!["Hello, World"]);
        assert_eq!(docs[0].variables["name"], "Test");
    }

    #[test]
    fn test_parse_subcommand() {
        let docs = parse("command: docker\nsubcommand: ps\nargs:\n  - -a\n").unwrap();
        assert_eq!(docs[0].subcommand.as_deref(), Some("ps"));
        assert_eq!(docs[0].args, vec!["-a"]);
    }

    #[test]
    fn test_missing_command_rejected() {
        let result = parse("args:\n  - \"test\"\n");
        assert!(matches!(result, Err(ConfigError::NoValidDocuments(_))));
    }

    #[test]
    fn test_multiple_documents_skip_invalid() {
        let docs = parse(
            "command: echo\nargs: [first]\n---\nargs: [orphan]\n---\ncommand: echo\nargs: [second]\n---\n",
        )
        .unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].args, vec!["first"]);
        assert_eq!(docs[1].args, vec!["second"]);
    }

    #[test]
    fn test_scalar_values_become_strings() {
        let docs = parse(
            "command: serve\nargs:\n  - --port\n  - 8080\n  - true\nvariables:\n  ratio: 1.5\n  empty:\n",
        )
        .unwrap();
        assert_eq!(docs[0].args, vec!["--port", "8080", "true"]);
        assert_eq!(docs[0].variables["ratio"], "1.5");
        assert_eq!(docs[0].variables["empty"], "");
    }

    #[test]
    fn test_number_like_scalars_keep_their_text() {
        let docs = parse(
            "command: pyenv\nargs: [install, \"{v}\", 0x1F, 1e3]\nvariables:\n  v: 3.10\n  go: 1.20\n",
        )
        .unwrap();
        assert_eq!(docs[0].args, vec!["install", "{v}", "0x1F", "1e3"]);
        assert_eq!(docs[0].variables["v"], "3.10");
        assert_eq!(docs[0].variables["go"], "1.20");

        let cmd = crate::commands::template::build_command(&docs[0], &HashMap::new()).unwrap();
        assert_eq!(cmd.to_string(), "pyenv install 3.10 0x1F 1e3");
    }

    #[test]
    fn test_from_file_json_scalars() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wf.json");
        std::fs::write(
            &path,
            r#"{"command": "serve", "args": ["--port", 8080, true], "variables": {"n": null}}"#,
        )
        .unwrap();
        let docs = from_file(&path).unwrap();
        assert_eq!(docs[0].args, vec!["--port", "8080", "true"]);
        assert_eq!(docs[0].variables["n"], "");
    }

    #[test]
    fn test_comment_only_variables_block() {
        let docs = parse("command: echo\nvariables:\n  # name: x\n").unwrap();
        assert!(docs[0].variables.is_empty());
    }

    #[test]
    fn test_invalid_yaml() {
        let result = parse("command: [unclosed\n");
        assert!(matches!(result, Err(ConfigError::Yaml { .. })));
    }

    #[test]
    fn test_from_file_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wf.json");
        std::fs::write(
            &path,
            r#"{"command": "git", "subcommand": "status", "args": ["-s"]}"#,
        )
        .unwrap();
        let docs = from_file(&path).unwrap();
        assert_eq!(docs[0].command, "git");
        assert_eq!(docs[0].subcommand.as_deref(), Some("status"));
    }

    #[test]
    fn test_from_file_missing() {
        let result = from_file(Path::new("/nonexistent/linea.yml"));
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }
}
