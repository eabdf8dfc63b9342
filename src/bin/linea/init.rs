use std::path::PathBuf;
use std::process::ExitCode;

use clap::Args;

use linea::messages::Painter;
use linea::scaffold::{has_workflow_extension, init_workflow};

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path of the workflow file to create
    file: PathBuf,
}

/// Write a template workflow file.
///
/// # Errors
///
/// Returns an error if the file already exists or cannot be written.
pub fn run(args: &InitArgs) -> Result<ExitCode, Box<dyn std::error::Error>> {
    if !has_workflow_extension(&args.file) {
        let err = Painter::stderr();
        eprintln!(
            "{}",
            err.warning(&format!(
                "{} does not end in .yml or .yaml",
                args.file.display()
            ))
        );
    }
    init_workflow(&args.file)?;

    let out = Painter::stdout();
    println!(
        "{}",
        out.success(&format!("Created {}", args.file.display()))
    );
    println!("Edit it, then try: linea help {}", args.file.display());
    Ok(ExitCode::SUCCESS)
}
