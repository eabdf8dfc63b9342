//! Line-range interpreter for `lineash` scripts.
//!
//! Blocks are not parsed into a tree. Each block handler finds its terminator with
//! [`blocks::find_matching_end`] and recurses into the line range of its body, returning the
//! index just past the terminator.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use log::{debug, warn};

use crate::script::blocks::{find_else, find_matching_end};
use crate::script::context::ScriptContext;
use crate::script::dispatch::Dispatcher;
use crate::script::resolver::VerbResolver;
use crate::script::scanner::{ForHeader, LineKind, split_lines, strip_echo_quotes, tokenize};
use crate::script::{ScriptError, WorkflowError};

#[derive(Debug, Clone)]
pub struct InterpreterOptions {
    /// Log a failing statement inside a block and carry on with the next line. Failures
    /// outside any block always abort the script.
    pub continue_on_error: bool,
    /// Checked before every statement and loop iteration.
    pub cancel: Option<Arc<AtomicBool>>,
}

impl Default for InterpreterOptions {
    fn default() -> Self {
        InterpreterOptions {
            continue_on_error: true,
            cancel: None,
        }
    }
}

pub struct Interpreter<'a> {
    ctx: ScriptContext,
    resolver: &'a dyn VerbResolver,
    dispatcher: &'a mut dyn Dispatcher,
    options: InterpreterOptions,
}

impl<'a> Interpreter<'a> {
    pub fn new(
        params: Vec<String>,
        resolver: &'a dyn VerbResolver,
        dispatcher: &'a mut dyn Dispatcher,
    ) -> Self {
        Interpreter {
            ctx: ScriptContext::new(params),
            resolver,
            dispatcher,
            options: InterpreterOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: InterpreterOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn into_context(self) -> ScriptContext {
        self.ctx
    }

    /// Run a whole script.
    ///
    /// # Errors
    ///
    /// Returns the first failure outside a block, any failure when `continue_on_error` is
    /// off, or `ScriptError::Cancelled` once the cancel flag is raised.
    pub fn run(&mut self, script: &str) -> Result<(), ScriptError> {
        let lines = split_lines(script);
        debug!("Running script with {} lines", lines.len());
        self.execute_range(&lines, 0, lines.len(), false)
    }

    fn check_cancelled(&self, index: usize) -> Result<(), ScriptError> {
        match &self.options.cancel {
            Some(flag) if flag.load(Ordering::SeqCst) => {
                Err(ScriptError::Cancelled { line: index + 1 })
            }
            _ => Ok(()),
        }
    }

    fn execute_range(
        &mut self,
        lines: &[&str],
        start: usize,
        end: usize,
        nested: bool,
    ) -> Result<(), ScriptError> {
        let mut i = start;
        while i < end {
            self.check_cancelled(i)?;
            let line = lines[i];
            i = match LineKind::classify(line) {
                LineKind::Skip => i + 1,
                LineKind::Keyword => {
                    debug!("Ignoring `{line}` at line {}", i + 1);
                    i + 1
                }
                LineKind::Assignment { name, value } => {
                    let value = self.ctx.substitute(value);
                    self.ctx.set(name, value);
                    i + 1
                }
                LineKind::If(condition) => self.execute_if(lines, i, end, condition)?,
                LineKind::For(header) => self.execute_for(lines, i, end, header)?,
                LineKind::While(condition) => self.execute_while(lines, i, end, condition)?,
                LineKind::Command(text) => {
                    match self.execute_command(text, i) {
                        Ok(()) => {}
                        Err(e) if nested && self.options.continue_on_error => {
                            warn!("{e}, continuing");
                        }
                        Err(e) => return Err(e),
                    }
                    i + 1
                }
            };
        }
        Ok(())
    }

    fn execute_if(
        &mut self,
        lines: &[&str],
        opener: usize,
        limit: usize,
        condition: &str,
    ) -> Result<usize, ScriptError> {
        let end = find_matching_end(lines, opener, limit);
        let else_at = find_else(lines, opener, end);
        let met = self.ctx.evaluate_condition(condition);
        debug!(
            "if at line {}: `{condition}` is {met}, block ends at line {}",
            opener + 1,
            end + 1
        );

        if met {
            self.execute_range(lines, opener + 1, else_at.unwrap_or(end), true)?;
        } else if let Some(else_at) = else_at {
            self.execute_range(lines, else_at + 1, end, true)?;
        }
        Ok(end + 1)
    }

    fn execute_for(
        &mut self,
        lines: &[&str],
        opener: usize,
        limit: usize,
        header: &str,
    ) -> Result<usize, ScriptError> {
        let Some(header) = ForHeader::parse(header) else {
            warn!("Skipping malformed for loop at line {}: {header}", opener + 1);
            return Ok(opener + 1);
        };
        let end = find_matching_end(lines, opener, limit);
        let values: Vec<String> = header
            .values
            .iter()
            .map(|value| self.ctx.substitute(value))
            .collect();
        debug!(
            "for at line {}: {} over {values:?}",
            opener + 1,
            header.variable
        );

        for value in values {
            self.check_cancelled(opener)?;
            self.ctx.set(&header.variable, value);
            self.execute_range(lines, opener + 1, end, true)?;
        }
        Ok(end + 1)
    }

    fn execute_while(
        &mut self,
        lines: &[&str],
        opener: usize,
        limit: usize,
        condition: &str,
    ) -> Result<usize, ScriptError> {
        let end = find_matching_end(lines, opener, limit);
        let mut iterations = 0usize;
        while self.ctx.evaluate_condition(condition) {
            self.check_cancelled(opener)?;
            self.execute_range(lines, opener + 1, end, true)?;
            iterations += 1;
        }
        debug!(
            "while at line {} finished after {iterations} iterations",
            opener + 1
        );
        Ok(end + 1)
    }

    fn execute_command(&mut self, text: &str, index: usize) -> Result<(), ScriptError> {
        let line_no = index + 1;
        let line = self.ctx.substitute(text);
        let words = tokenize(&line);
        let Some(verb) = words.first() else {
            return Ok(());
        };

        let documents = self
            .resolver
            .resolve(verb)
            .map_err(|source| ScriptError::Workflow {
                line: line_no,
                source,
            })?;
        if let Some(documents) = documents {
            debug!("Line {line_no}: workflow {verb}");
            return self
                .dispatcher
                .run_workflow(verb, &documents, &words[1..])
                .map_err(|source| ScriptError::Workflow {
                    line: line_no,
                    source: WorkflowError::Run(source),
                });
        }

        let line = if line.starts_with("echo ") {
            strip_echo_quotes(&line)
        } else {
            line
        };
        debug!("Line {line_no}: system command `{line}`");
        self.dispatcher
            .run_system(&line)
            .map_err(|source| ScriptError::Command {
                line: line_no,
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::commands::workflow::Workflow;
    use crate::exec::ExecError;
    use crate::runner::RunError;

    #[derive(Default)]
    struct Recorder {
        calls: Vec<String>,
        fail_on: Option<&'static str>,
        cancel_after: Option<(usize, Arc<AtomicBool>)>,
    }

    impl Recorder {
        fn record(&mut self, call: String) -> bool {
            let failed = self.fail_on.is_some_and(|f| call.contains(f));
            self.calls.push(call);
            if let Some((limit, flag)) = &self.cancel_after
                && self.calls.len() >= *limit
            {
                flag.store(true, Ordering::SeqCst);
            }
            failed
        }
    }

    impl Dispatcher for Recorder {
        fn run_workflow(
            &mut self,
            verb: &str,
            _documents: &[Workflow],
            args: &[String],
        ) -> Result<(), RunError> {
            let call = format!("{verb}({})", args.join(","));
            if self.record(call) {
                Err(RunError::Exec(ExecError::Empty))
            } else {
                Ok(())
            }
        }

        fn run_system(&mut self, line: &str) -> Result<(), ExecError> {
            if self.record(line.to_string()) {
                Err(ExecError::Empty)
            } else {
                Ok(())
            }
        }
    }

    fn resolver() -> HashMap<String, Vec<Workflow>> {
        HashMap::from([("create-vm".to_string(), vec![Workflow::new("echo")])])
    }

    fn run(script: &str, recorder: &mut Recorder) -> (Result<(), ScriptError>, ScriptContext) {
        run_with(script, recorder, InterpreterOptions::default())
    }

    fn run_with(
        script: &str,
        recorder: &mut Recorder,
        options: InterpreterOptions,
    ) -> (Result<(), ScriptError>, ScriptContext) {
        let resolver = resolver();
        let mut interpreter =
            Interpreter::new(vec!["app".into(), "prod".into()], &resolver, recorder)
                .with_options(options);
        let result = interpreter.run(script);
        (result, interpreter.into_context())
    }

    #[test]
    fn test_assignment_and_echo() {
        let mut rec = Recorder::default();
        let (result, ctx) = run(
            "#!/usr/bin/env lineash\n# comment\nNAME=\"my vm\"\necho \"Hello $NAME\"\n",
            &mut rec,
        );
        result.unwrap();
        assert_eq!(ctx.get("NAME"), Some("my vm"));
        assert_eq!(rec.calls, vec!["echo Hello my vm"]);
    }

    #[test]
    fn test_workflow_verb_dispatch() {
        let mut rec = Recorder::default();
        let (result, _) = run("VM=web\ncreate-vm -s name=\"$VM\" -v\nls -la", &mut rec);
        result.unwrap();
        assert_eq!(rec.calls, vec!["create-vm(-s,name=web,-v)", "ls -la"]);
    }

    #[test]
    fn test_if_else() {
        let mut rec = Recorder::default();
        let script = "OS=debian\nif $OS == alpine\necho alpine\nelse\necho other\nend\necho done";
        let (result, _) = run(script, &mut rec);
        result.unwrap();
        assert_eq!(rec.calls, vec!["echo other", "echo done"]);
    }

    #[test]
    fn test_legacy_keywords() {
        let mut rec = Recorder::default();
        let script = "X=1\nif [ $X == 1 ]\nthen\n  echo yes\nfi\nfor v in a b do\ndo\n  echo $v\ndone";
        let (result, _) = run(script, &mut rec);
        result.unwrap();
        assert_eq!(rec.calls, vec!["echo yes", "echo a", "echo b"]);
    }

    #[test]
    fn test_nested_blocks() {
        let mut rec = Recorder::default();
        let script = "\
for env in dev prod
  if $env == prod
    n=0
    while $n < 2
      echo $env $n
      n=$((n + 1))
    end
  else
    echo skip $env
  end
end";
        let (result, _) = run(script, &mut rec);
        result.unwrap();
        assert_eq!(rec.calls, vec!["echo skip dev", "echo prod 0", "echo prod 1"]);
    }

    #[test]
    fn test_stray_keywords_ignored() {
        let mut rec = Recorder::default();
        let (result, _) = run("end\necho a\ndone\nelse", &mut rec);
        result.unwrap();
        assert_eq!(rec.calls, vec!["echo a"]);
    }

    #[test]
    fn test_malformed_for_header_skips_line() {
        let mut rec = Recorder::default();
        let (result, _) = run("for x of a b\necho body\nend", &mut rec);
        result.unwrap();
        assert_eq!(rec.calls, vec!["echo body"]);
    }

    #[test]
    fn test_block_errors_continue_by_default() {
        let mut rec = Recorder {
            fail_on: Some("boom"),
            ..Default::default()
        };
        let (result, _) = run("if 1 == 1\necho boom\necho after\nend\necho tail", &mut rec);
        result.unwrap();
        assert_eq!(rec.calls, vec!["echo boom", "echo after", "echo tail"]);
    }

    #[test]
    fn test_strict_mode_propagates_block_errors() {
        let mut rec = Recorder {
            fail_on: Some("boom"),
            ..Default::default()
        };
        let options = InterpreterOptions {
            continue_on_error: false,
            cancel: None,
        };
        let (result, _) = run_with("if 1 == 1\necho boom\necho after\nend", &mut rec, options);
        match result {
            Err(ScriptError::Command { line, .. }) => assert_eq!(line, 2),
            other => panic!("Expected Command error, got: {other:?}"),
        }
        assert_eq!(rec.calls, vec!["echo boom"]);
    }

    #[test]
    fn test_top_level_workflow_error_aborts() {
        let mut rec = Recorder {
            fail_on: Some("create-vm"),
            ..Default::default()
        };
        let (result, _) = run("echo one\n\ncreate-vm\necho two", &mut rec);
        let err = result.unwrap_err();
        assert_eq!(err.line(), Some(3));
        assert!(
            err.to_string()
                .starts_with("error executing workflow at line 3:")
        );
        assert_eq!(rec.calls, vec!["echo one", "create-vm()"]);
    }

    #[test]
    fn test_cancel_stops_infinite_loop() {
        let flag = Arc::new(AtomicBool::new(false));
        let mut rec = Recorder {
            cancel_after: Some((3, Arc::clone(&flag))),
            ..Default::default()
        };
        let options = InterpreterOptions {
            continue_on_error: true,
            cancel: Some(flag),
        };
        let (result, _) = run_with("while 1 == 1\necho spin\nend", &mut rec, options);
        assert!(matches!(result, Err(ScriptError::Cancelled { .. })));
        assert_eq!(rec.calls.len(), 3);
    }

    #[test]
    fn test_positional_parameters() {
        let mut rec = Recorder::default();
        let (result, _) = run("echo Deploying $1 to $2", &mut rec);
        result.unwrap();
        assert_eq!(rec.calls, vec!["echo Deploying app to prod"]);
    }
}
