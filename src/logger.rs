use std::io::{IsTerminal, Write};
use std::time::Instant;

use anstyle::Style;
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use parking_lot::Mutex;

use crate::theme;

struct LineaLogger {
    file: Option<Mutex<std::fs::File>>,
    filter: LevelFilter,
    color: bool,
    start: Instant,
}

impl Log for LineaLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.filter
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let elapsed = self.start.elapsed().as_secs_f64();
        let level = record.level();
        let style = if self.color {
            level_style(level)
        } else {
            Style::new()
        };
        let _ = writeln!(
            std::io::stderr().lock(),
            "[{elapsed:.3}s] [{style}{level}{style:#}] {} - {}",
            record.target(),
            record.args()
        );

        if let Some(ref file) = self.file {
            let _ = writeln!(
                file.lock(),
                "[{elapsed:.3}s] [{level}] {} - {}",
                record.target(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
        if let Some(ref file) = self.file {
            let _ = file.lock().flush();
        }
    }
}

/// Parse a `RUST_LOG`-style level, falling back to `warn`.
#[must_use]
pub fn parse_filter(value: Option<&str>) -> LevelFilter {
    value
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(LevelFilter::Warn)
}

/// Style used for a level tag on a terminal.
#[must_use]
pub fn level_style(level: Level) -> Style {
    match level {
        Level::Error => theme::FAILURE,
        Level::Warn => theme::WARNING,
        Level::Info => theme::ACCENT,
        Level::Debug | Level::Trace => theme::DIM,
    }
}

/// Install the global logger. Records go to stderr and, when given, to `log_file`.
///
/// The level comes from `RUST_LOG` and defaults to `warn`.
///
/// # Errors
///
/// Returns `SetLoggerError` if a logger is already installed.
pub fn init(log_file: Option<std::fs::File>) -> Result<(), SetLoggerError> {
    let filter = parse_filter(std::env::var("RUST_LOG").ok().as_deref());

    let logger = LineaLogger {
        file: log_file.map(Mutex::new),
        filter,
        color: std::io::stderr().is_terminal(),
        start: Instant::now(),
    };

    log::set_boxed_logger(Box::new(logger))?;
    log::set_max_level(filter);
    Ok(())
}
