mod app;
mod dry_run;
mod help;
mod init;
mod run;

use std::process::ExitCode;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "linea",
    version,
    about = "Run command templates described in YAML workflow files",
    disable_help_subcommand = true
)]
struct Cli {
    /// Log file path (records are also written to stderr)
    #[arg(long, global = true)]
    log_file: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Execute every command in a workflow file
    Run(run::RunArgs),
    /// Show the commands a workflow file would execute, without running them
    Test(dry_run::TestArgs),
    /// Describe the commands, arguments and variables of a workflow file
    Help(help::HelpArgs),
    /// Write a commented template workflow file
    Init(init::InitArgs),
    /// Manage Linea apps
    App(app::AppArgs),
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let log_file = cli.log_file.as_deref().map(std::fs::File::create).transpose()?;
    linea::logger::init(log_file)?;

    match cli.command {
        Commands::Run(ref args) => run::run(args),
        Commands::Test(ref args) => dry_run::run(args),
        Commands::Help(ref args) => help::run(args),
        Commands::Init(ref args) => init::run(args),
        Commands::App(ref args) => app::run(args),
    }
}
