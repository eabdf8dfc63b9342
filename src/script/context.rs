use crate::script::eval::{self, Reference};
use crate::substitution::{self, Scope, Unbound};

/// Variable scope and positional parameters of one script run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptContext {
    variables: Scope,
    params: Vec<String>,
}

impl ScriptContext {
    #[must_use]
    pub fn new(params: Vec<String>) -> Self {
        ScriptContext {
            variables: Scope::new(),
            params,
        }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.variables.get(name).map(String::as_str)
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.variables.insert(name.into(), value.into());
    }

    #[must_use]
    pub fn variables(&self) -> &Scope {
        &self.variables
    }

    /// Expand a line: arithmetic first, then positional parameters, then variables.
    ///
    /// `{name}` is literal in scripts. Unknown `$name` references are kept so the host
    /// shell can still expand environment variables.
    #[must_use]
    pub fn substitute(&self, line: &str) -> String {
        let line = eval::substitute_arithmetic(line, &self.variables, &self.params);
        let line = eval::substitute_positional(&line, &self.params);
        substitution::substitute(&line, None, &self.variables, Unbound::Keep)
    }

    /// Resolve a condition operand: a lone reference is looked up, anything else is literal.
    fn operand<'s>(&'s self, text: &'s str) -> &'s str {
        match Reference::parse(text) {
            Some(reference) => reference.resolve(&self.variables, &self.params),
            None => eval::unquote(text.trim()),
        }
    }

    /// Evaluate an `if`/`while` condition.
    ///
    /// `-n X` and a lone `$NAME` are true when the value is non-empty. Otherwise the
    /// condition is expanded and split on its comparison operator; without one it is false.
    #[must_use]
    pub fn evaluate_condition(&self, raw: &str) -> bool {
        let condition = eval::strip_brackets(raw);

        if let Some(operand) = condition.strip_prefix("-n ") {
            let operand = operand.trim();
            let name = eval::unquote(operand);
            if substitution::is_identifier(name) {
                return self.get(name).is_some_and(|v| !v.is_empty());
            }
            return !self.operand(&self.substitute(operand)).is_empty();
        }
        if Reference::parse(condition).is_some() {
            return !self.operand(condition).is_empty();
        }

        let expanded = self.substitute(condition);
        match eval::split_comparison(&expanded) {
            Some((left, op, right)) => op.apply(self.operand(left), self.operand(right)),
            None => false,
        }
    }
}
