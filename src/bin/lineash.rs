use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use clap::Parser;
use log::{debug, warn};

use linea::script::{
    Interpreter, InterpreterOptions, ProcessDispatcher, ScriptError, WorkflowDirectory,
};

#[derive(Parser, Debug)]
#[command(
    name = "lineash",
    version,
    about = "Run lineash scripts, calling workflows from .linea/workflows by name"
)]
struct Cli {
    /// Stop at the first failing statement, including inside if/for/while blocks
    #[arg(long)]
    strict: bool,

    /// Log file path (records are also written to stderr)
    #[arg(long)]
    log_file: Option<String>,

    /// Script to run
    script: PathBuf,

    /// Positional parameters, available as $1, $2, ...
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
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

fn script_dir(script: &Path) -> PathBuf {
    let dir = script
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    std::fs::canonicalize(dir).unwrap_or_else(|_| dir.to_path_buf())
}

#[tokio::main]
async fn run() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let log_file = cli.log_file.as_deref().map(std::fs::File::create).transpose()?;
    linea::logger::init(log_file)?;

    let script = std::fs::read_to_string(&cli.script).map_err(|source| ScriptError::Read {
        path: cli.script.clone(),
        source,
    })?;
    let start = script_dir(&cli.script);
    let workflows = WorkflowDirectory::discover(&start)
        .ok_or_else(|| ScriptError::WorkflowsDirNotFound(start.clone()))?;
    debug!("Available workflows: {:?}", workflows.names());

    let cancel = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&cancel);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, stopping before the next statement");
            flag.store(true, Ordering::SeqCst);
        }
    });

    let options = InterpreterOptions {
        continue_on_error: !cli.strict,
        cancel: Some(cancel),
    };
    let params = cli.args;
    tokio::task::spawn_blocking(move || {
        let mut dispatcher = ProcessDispatcher;
        Interpreter::new(params, &workflows, &mut dispatcher)
            .with_options(options)
            .run(&script)
    })
    .await??;

    Ok(ExitCode::SUCCESS)
}
