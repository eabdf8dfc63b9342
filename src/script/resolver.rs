//! Mapping script verbs to workflow documents.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::commands::workflow::Workflow;
use crate::config_file;
use crate::scaffold::WORKFLOW_EXTENSIONS;
use crate::script::WorkflowError;

/// Decides whether a verb names a workflow.
pub trait VerbResolver {
    /// Returns the workflow's documents, or `None` when the verb is not a workflow.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError` when the verb names a workflow that cannot be loaded.
    fn resolve(&self, verb: &str) -> Result<Option<Vec<Workflow>>, WorkflowError>;
}

impl VerbResolver for HashMap<String, Vec<Workflow>> {
    fn resolve(&self, verb: &str) -> Result<Option<Vec<Workflow>>, WorkflowError> {
        Ok(self.get(verb).cloned())
    }
}

/// A `.linea/workflows` directory. Each `NAME.yml` or `NAME.yaml` file is the verb `NAME`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowDirectory {
    dir: PathBuf,
}

impl WorkflowDirectory {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        WorkflowDirectory { dir: dir.into() }
    }

    /// Walk up from `start` looking for `.linea/workflows`.
    #[must_use]
    pub fn discover(start: &Path) -> Option<Self> {
        let mut path = start.to_path_buf();
        debug!("Searching for workflows directory from {}", start.display());
        loop {
            let candidate = path.join(".linea").join("workflows");
            if candidate.is_dir() {
                info!("Found workflows directory: {}", candidate.display());
                return Some(WorkflowDirectory::new(candidate));
            }
            if !path.pop() {
                return None;
            }
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.dir
    }

    /// Names of every workflow in the directory, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let base = glob::Pattern::escape(&self.dir.to_string_lossy());
        let mut names: Vec<String> = WORKFLOW_EXTENSIONS
            .iter()
            .filter_map(|ext| match glob::glob(&format!("{base}/*.{ext}")) {
                Ok(paths) => Some(paths),
                Err(e) => {
                    warn!("Invalid workflow pattern in {}: {e}", self.dir.display());
                    None
                }
            })
            .flatten()
            .filter_map(Result::ok)
            .filter(|path| path.is_file())
            .filter_map(|path| {
                path.file_stem()
                    .map(|stem| stem.to_string_lossy().into_owned())
            })
            .collect();
        names.sort();
        names.dedup();
        names
    }

    fn file_for(&self, name: &str) -> Option<PathBuf> {
        // A verb containing a separator would escape the directory.
        if name.is_empty() || name.contains(['/', '\\']) || name.starts_with('.') {
            return None;
        }
        WORKFLOW_EXTENSIONS
            .iter()
            .map(|ext| self.dir.join(format!("{name}.{ext}")))
            .find(|path| path.is_file())
    }

    /// Load the documents of workflow `name`.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::Missing` if no file exists for `name`, or
    /// `WorkflowError::Load` if it cannot be parsed.
    pub fn load(&self, name: &str) -> Result<Vec<Workflow>, WorkflowError> {
        let path = self
            .file_for(name)
            .ok_or_else(|| WorkflowError::Missing(name.to_string()))?;
        debug!("Loading workflow {name} from {}", path.display());
        config_file::from_file(&path).map_err(|source| WorkflowError::Load {
            name: name.to_string(),
            source,
        })
    }
}

impl VerbResolver for WorkflowDirectory {
    fn resolve(&self, verb: &str) -> Result<Option<Vec<Workflow>>, WorkflowError> {
        if self.file_for(verb).is_none() {
            return Ok(None);
        }
        self.load(verb).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn workflows_dir() -> (tempfile::TempDir, PathBuf) {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join(".linea").join("workflows");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("greet.yml"), "command: echo\nargs: [hello]\n").unwrap();
        std::fs::write(dir.join("list.yaml"), "command: ls\n").unwrap();
        std::fs::write(dir.join("notes.txt"), "not a workflow").unwrap();
        std::fs::write(dir.join("broken.yml"), "args: [x]\n").unwrap();
        (root, dir)
    }

    #[test]
    fn test_discover_walks_up() {
        let (root, dir) = workflows_dir();
        let nested = root.path().join("scripts").join("deep");
        std::fs::create_dir_all(&nested).unwrap();
        let found = WorkflowDirectory::discover(&nested).unwrap();
        assert_eq!(found.path(), dir);
    }

    #[test]
    fn test_discover_none() {
        let root = tempfile::tempdir().unwrap();
        // Anything found here lives above the temp dir, outside the test's control.
        let found = WorkflowDirectory::discover(root.path());
        assert!(found.is_none_or(|d| !d.path().starts_with(root.path())));
    }

    #[test]
    fn test_names() {
        let (_root, dir) = workflows_dir();
        let names = WorkflowDirectory::new(dir).names();
        assert_eq!(names, vec!["broken", "greet", "list"]);
    }

    #[test]
    fn test_resolve() {
        let (_root, dir) = workflows_dir();
        let workflows = WorkflowDirectory::new(dir);

        let greet = workflows.resolve("greet").unwrap().unwrap();
        assert_eq!(greet[0].args, vec!["hello"]);
        assert!(workflows.resolve("list").unwrap().is_some());
        assert!(workflows.resolve("echo").unwrap().is_none());
        assert!(workflows.resolve("notes").unwrap().is_none());
        assert!(workflows.resolve("../workflows/greet").unwrap().is_none());

        match workflows.resolve("broken") {
            Err(WorkflowError::Load { name, .. }) => assert_eq!(name, "broken"),
            other => panic!("Expected Load error, got: {other:?}"),
        }
    }

    #[test]
    fn test_load_missing() {
        let (_root, dir) = workflows_dir();
        match WorkflowDirectory::new(dir).load("nope") {
            Err(WorkflowError::Missing(name)) => assert_eq!(name, "nope"),
            other => panic!("Expected Missing error, got: {other:?}"),
        }
    }

    #[test]
    fn test_in_memory_resolver() {
        let mut map = HashMap::new();
        map.insert("deploy".to_string(), vec![Workflow::new("echo")]);
        assert!(map.resolve("deploy").unwrap().is_some());
        assert!(map.resolve("other").unwrap().is_none());
    }
}
