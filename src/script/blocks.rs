//! Block boundary matching over trimmed script lines.
//!
//! All block kinds share one terminator vocabulary, so depth rises on any opener and falls
//! on any terminator.

/// Accepted block terminators: `end`, and the legacy `fi` and `done`.
pub const TERMINATORS: [&str; 3] = ["end", "fi", "done"];

#[must_use]
pub fn is_block_opener(line: &str) -> bool {
    line.starts_with("if ") || line.starts_with("for ") || line.starts_with("while ")
}

#[must_use]
pub fn is_terminator(line: &str) -> bool {
    TERMINATORS.contains(&line)
}

/// Index of the terminator closing the block opened at `opener`.
///
/// Only lines before `limit` are considered. Returns `limit` when the block is never closed,
/// so an unterminated block runs to the end of its enclosing range.
#[must_use]
pub fn find_matching_end(lines: &[&str], opener: usize, limit: usize) -> usize {
    let limit = limit.min(lines.len());
    let mut depth = 1usize;
    for (i, line) in lines.iter().enumerate().take(limit).skip(opener + 1) {
        if is_block_opener(line) {
            depth += 1;
        } else if is_terminator(line) {
            depth -= 1;
            if depth == 0 {
                return i;
            }
        }
    }
    limit
}

/// Index of the `else` belonging to the block opened at `opener`, searching up to `end`.
///
/// An `else` inside a nested block is skipped.
#[must_use]
pub fn find_else(lines: &[&str], opener: usize, end: usize) -> Option<usize> {
    let end = end.min(lines.len());
    let mut depth = 0usize;
    for (i, line) in lines.iter().enumerate().take(end).skip(opener + 1) {
        if is_block_opener(line) {
            depth += 1;
        } else if is_terminator(line) {
            depth = depth.saturating_sub(1);
        } else if *line == "else" && depth == 0 {
            return Some(i);
        }
    }
    None
}
