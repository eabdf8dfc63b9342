use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Subcommand};

use linea::messages::Painter;
use linea::scaffold::{APP_FILES, create_app};

#[derive(Args, Debug)]
pub struct AppArgs {
    #[command(subcommand)]
    command: AppCommand,
}

#[derive(Subcommand, Debug)]
enum AppCommand {
    /// Scaffold an app with example workflows and a lineash script
    Create {
        /// Directory name of the new app
        name: PathBuf,
    },
}

/// Run an `app` subcommand.
///
/// # Errors
///
/// Returns an error if the app directory already exists or cannot be written.
pub fn run(args: &AppArgs) -> Result<ExitCode, Box<dyn std::error::Error>> {
    match args.command {
        AppCommand::Create { ref name } => {
            create_app(name)?;
            let out = Painter::stdout();
            println!(
                "{}",
                out.success(&format!("Created app {}", name.display()))
            );
            for file in APP_FILES {
                println!("  {}", name.join(file).display());
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}
