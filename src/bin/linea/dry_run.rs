use std::path::PathBuf;
use std::process::ExitCode;

use clap::Args;

use linea::commands::overrides::parse_override_arg;
use linea::runner::{RunOptions, run_documents};
use linea::substitution::Scope;

#[derive(Args, Debug)]
pub struct TestArgs {
    /// Workflow file (.yml, .yaml or .json)
    file: PathBuf,

    /// Override a `$variable` (repeatable)
    #[arg(
        short = 's',
        long = "set",
        visible_alias = "args",
        value_name = "VAR=VALUE",
        value_parser = parse_override_arg
    )]
    overrides: Vec<(String, String)>,
}

/// Print what `run` would execute.
///
/// # Errors
///
/// Returns an error if the file cannot be loaded or a command cannot be built.
pub fn run(args: &TestArgs) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let documents = linea::load_workflows(&args.file)?;
    let overrides: Scope = args.overrides.iter().cloned().collect();
    let options = RunOptions {
        dry_run: true,
        ..Default::default()
    };
    run_documents(&documents, &overrides, options)?;
    Ok(ExitCode::SUCCESS)
}
