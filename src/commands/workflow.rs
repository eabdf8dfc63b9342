use std::collections::HashMap;

/// One workflow document: a command template plus its declared variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Workflow {
    pub command: String,
    pub subcommand: Option<String>,
    pub args: Vec<String>,
    pub variables: HashMap<String, String>,
}

impl Workflow {
    #[must_use]
    pub fn new(command: impl Into<String>) -> Self {
        Workflow {
            command: command.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_subcommand(mut self, subcommand: impl Into<String>) -> Self {
        self.subcommand = Some(subcommand.into());
        self
    }

    #[must_use]
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_variable(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.insert(name.into(), value.into());
        self
    }
}
