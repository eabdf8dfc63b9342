//! User-facing status lines printed by the runner and the CLI.
//!
//! Colors are only emitted when the target stream is a terminal.

use std::io::IsTerminal;
use std::time::Duration;

use anstyle::{Reset, Style};

use crate::theme;

/// Whether ANSI styling should be applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Painter {
    color: bool,
}

impl Painter {
    #[must_use]
    pub fn new(color: bool) -> Self {
        Painter { color }
    }

    /// Painter for stdout, colored only on a terminal.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(std::io::stdout().is_terminal())
    }

    /// Painter for stderr, colored only on a terminal.
    #[must_use]
    pub fn stderr() -> Self {
        Self::new(std::io::stderr().is_terminal())
    }

    #[must_use]
    pub fn paint(&self, style: Style, text: &str) -> String {
        if self.color {
            format!("{style}{text}{Reset}")
        } else {
            text.to_string()
        }
    }

    fn arrow(&self) -> String {
        self.paint(theme::ACCENT, "❱")
    }

    /// `❱ Executing: <command>`
    #[must_use]
    pub fn start_message(&self, command: &str) -> String {
        format!("{} Executing: {command}", self.arrow())
    }

    /// Two-line dry run banner followed by the rendered command.
    #[must_use]
    pub fn dry_run_message(&self, command: &str) -> String {
        format!(
            "{}\n{command}",
            self.paint(theme::DIM, "Dry run - would execute:")
        )
    }

    /// `[i/N] ` prefix for one step of a multi-document run.
    #[must_use]
    pub fn step_prefix(&self, index: usize, total: usize) -> String {
        let width = total.to_string().len();
        self.paint(theme::BOLD, &format!("[{index:>width$}/{total}]"))
    }

    #[must_use]
    pub fn success(&self, text: &str) -> String {
        format!("{} {}", self.paint(theme::SUCCESS, "✓"), text)
    }

    #[must_use]
    pub fn warning(&self, text: &str) -> String {
        self.paint(theme::WARNING, text)
    }

    /// `N commands: x passed, y failed (1.2s)`
    #[must_use]
    pub fn summary(&self, passed: usize, failed: usize, total: usize, elapsed: Duration) -> String {
        let mut parts = Vec::new();
        if passed > 0 {
            parts.push(self.paint(theme::SUCCESS, &format!("{passed} passed")));
        }
        if failed > 0 {
            parts.push(self.paint(theme::FAILURE, &format!("{failed} failed")));
        }
        format!(
            "{} {} {}",
            self.paint(theme::BOLD, &format!("{total} commands:")),
            parts.join(&self.paint(theme::DIM, ", ")),
            self.paint(theme::DIM, &format!("({})", format_duration(elapsed)))
        )
    }
}

#[must_use]
pub fn format_duration(d: Duration) -> String {
    let total_secs = d.as_secs();
    let tenths = d.subsec_millis() / 100;
    if total_secs < 60 {
        format!("{total_secs}.{tenths}s")
    } else {
        let mins = total_secs / 60;
        let secs = total_secs % 60;
        format!("{mins}m {secs}.{tenths}s")
    }
}
