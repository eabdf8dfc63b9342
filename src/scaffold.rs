use std::path::{Path, PathBuf};

use log::info;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScaffoldError {
    #[error("{0} already exists")]
    AlreadyExists(PathBuf),

    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

const WORKFLOW_TEMPLATE: &str = r#"# Linea Workflow Configuration
# This file defines commands that can be executed using: linea run <this-file>

# Main command to execute
command: echo

# Optional subcommand (for commands like: docker ps, git status, etc.)
# subcommand: ps

# Arguments to pass to the command
args:
  - "Hello, Linea!"
  - "This is a template workflow file"

# Variables for substitution
# {variable} always uses the value below; $variable can be overridden with -s/--set
variables:
  # message: "Custom message"
  # name: "Your Name"

# Example usage:
#   linea run <this-file>
#   linea run <this-file> -s message="Custom"
#   linea test <this-file>
#   linea help <this-file>

# Multiple Commands:
# You can define multiple commands in one file by separating them with ---
#
# command: echo
# args:
#   - "First command"
# ---
# command: echo
# args:
#   - "Second command"
"#;

const CREATE_VM_WORKFLOW: &str = r#"# Create VM Workflow
# Usage: linea run .linea/workflows/create-vm.yml -s name="vm-name"

command: echo
args:
  - "Creating VM: $name"
variables:
  name: "default-vm"
"#;

const LS_WORKFLOW: &str = "# List Directory Workflow
# Usage: linea run .linea/workflows/ls.yml

command: ls
args:
  - -l
  - -a
";

const EXAMPLE_SCRIPT: &str = r#"#!/usr/bin/env lineash
# Lineash script example: variables, conditionals, loops and workflow verbs
# Use $variable syntax in scripts ({variable} is for workflow YAML)

VM_NAME="my-vm"
VM_OS="alpine"

echo "Starting VM creation..."

if $VM_OS == alpine
    echo "Using Alpine Linux"
    create-vm -s name="$VM_NAME"
else
    echo "Using different OS"
end

for item in workflows scripts
    echo "Checking $item..."
    ls
end

count=1
while $count <= 3
    echo "Pass $count"
    count=$((count + 1))
end

echo "Script completed!"
"#;

/// Workflow file extensions recognized by the tooling.
pub const WORKFLOW_EXTENSIONS: [&str; 2] = ["yml", "yaml"];

#[must_use]
pub fn has_workflow_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| WORKFLOW_EXTENSIONS.contains(&ext))
}

fn write(path: &Path, contents: &str) -> Result<(), ScaffoldError> {
    std::fs::write(path, contents).map_err(|source| ScaffoldError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn create_dir(path: &Path) -> Result<(), ScaffoldError> {
    std::fs::create_dir_all(path).map_err(|source| ScaffoldError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Write a commented template workflow to `path`.
///
/// # Errors
///
/// Returns `ScaffoldError::AlreadyExists` if the file exists, or `ScaffoldError::Io` on
/// write failure.
pub fn init_workflow(path: &Path) -> Result<(), ScaffoldError> {
    if path.exists() {
        return Err(ScaffoldError::AlreadyExists(path.to_path_buf()));
    }
    write(path, WORKFLOW_TEMPLATE)?;
    info!("Created workflow template {}", path.display());
    Ok(())
}

/// Files created by [`create_app`], relative to the app directory.
pub const APP_FILES: [&str; 4] = [
    ".linea/workflows/create-vm.yml",
    ".linea/workflows/ls.yml",
    "scripts/script.lnsh",
    "README.md",
];

fn app_readme(name: &str) -> String {
    format!(
        "# {name}

This is a Linea app.

## Layout

- `.linea/workflows/` - workflow YAML files, callable as commands from scripts
- `scripts/` - lineash scripts (`.lnsh`)

## Usage

```bash
# Run a workflow directly
linea run .linea/workflows/create-vm.yml -s name=\"my-vm\"

# Run a script that uses workflows as commands
lineash scripts/script.lnsh
```
"
    )
}

/// Scaffold an app directory with example workflows, a script and a README.
///
/// # Errors
///
/// Returns `ScaffoldError::AlreadyExists` if `dir` exists, or `ScaffoldError::Io` on
/// write failure.
pub fn create_app(dir: &Path) -> Result<(), ScaffoldError> {
    if dir.exists() {
        return Err(ScaffoldError::AlreadyExists(dir.to_path_buf()));
    }

    let workflows = dir.join(".linea").join("workflows");
    let scripts = dir.join("scripts");
    create_dir(&workflows)?;
    create_dir(&scripts)?;

    write(&workflows.join("create-vm.yml"), CREATE_VM_WORKFLOW)?;
    write(&workflows.join("ls.yml"), LS_WORKFLOW)?;
    let script = scripts.join("script.lnsh");
    write(&script, EXAMPLE_SCRIPT)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o755);
        std::fs::set_permissions(&script, perms).map_err(|source| ScaffoldError::Io {
            path: script.clone(),
            source,
        })?;
    }

    let name = dir
        .file_name()
        .map_or_else(|| dir.display().to_string(), |n| n.to_string_lossy().into_owned());
    write(&dir.join("README.md"), &app_readme(&name))?;

    info!("Created app {}", dir.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config_file;

    #[test]
    fn test_init_writes_parsable_template() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("workflow.yml");
        init_workflow(&path).unwrap();
        let docs = config_file::from_file(&path).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].command, "echo");
    }

    #[test]
    fn test_init_refuses_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("workflow.yml");
        std::fs::write(&path, "command: ls\n").unwrap();
        assert!(matches!(
            init_workflow(&path),
            Err(ScaffoldError::AlreadyExists(_))
        ));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "command: ls\n");
    }

    #[test]
    fn test_create_app_layout() {
        let dir = tempfile::tempdir().unwrap();
        let app = dir.path().join("my-app");
        create_app(&app).unwrap();
        for file in APP_FILES {
            assert!(app.join(file).is_file(), "missing {file}");
        }
        let readme = std::fs::read_to_string(app.join("README.md")).unwrap();
        assert!(readme.starts_with("# my-app\n"));
        assert!(config_file::from_file(&app.join(".linea/workflows/create-vm.yml")).is_ok());
    }

    #[test]
    fn test_create_app_refuses_existing_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            create_app(dir.path()),
            Err(ScaffoldError::AlreadyExists(_))
        ));
    }

    #[test]
    fn test_workflow_extension() {
        assert!(has_workflow_extension(Path::new("a.yml")));
        assert!(has_workflow_extension(Path::new("dir/a.yaml")));
        assert!(!has_workflow_extension(Path::new("a.json")));
        assert!(!has_workflow_extension(Path::new("a")));
    }
}
