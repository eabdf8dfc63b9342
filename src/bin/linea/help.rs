use std::path::PathBuf;
use std::process::ExitCode;

use clap::Args;

#[derive(Args, Debug)]
pub struct HelpArgs {
    /// Workflow file to describe
    file: PathBuf,
}

/// Describe the documents of a workflow file.
///
/// # Errors
///
/// Returns an error if the file cannot be loaded or a command cannot be rendered.
pub fn run(args: &HelpArgs) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let documents = linea::load_workflows(&args.file)?;
    print!("{}", linea::describe::describe(&documents)?);
    Ok(ExitCode::SUCCESS)
}
