use std::path::PathBuf;
use std::process::ExitCode;

use clap::Args;

use linea::commands::overrides::parse_override_arg;
use linea::runner::{RunOptions, run_documents};
use linea::substitution::Scope;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Workflow file (.yml, .yaml or .json)
    file: PathBuf,

    /// Print each command before executing it
    #[arg(short, long)]
    verbose: bool,

    /// Keep executing the remaining commands after a failure
    #[arg(long)]
    keep_going: bool,

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

/// Build and execute every document of the workflow file.
///
/// # Errors
///
/// Returns an error if the file cannot be loaded, a command cannot be built, or a command
/// fails.
pub fn run(args: &RunArgs) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let documents = linea::load_workflows(&args.file)?;
    let overrides: Scope = args.overrides.iter().cloned().collect();
    let options = RunOptions {
        verbose: args.verbose,
        keep_going: args.keep_going,
        dry_run: false,
    };
    run_documents(&documents, &overrides, options)?.into_result()?;
    Ok(ExitCode::SUCCESS)
}
