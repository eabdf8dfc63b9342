//! Line classification and quote-aware tokenizing.

use crate::commands::overrides::OVERRIDE_FLAGS;
use crate::substitution::is_identifier;

/// Keywords that only make sense as part of a block.
pub const KEYWORDS: [&str; 6] = ["end", "fi", "done", "else", "then", "do"];

/// Split a script into trimmed lines. Index `i` is script line `i + 1`.
#[must_use]
pub fn split_lines(script: &str) -> Vec<&str> {
    script.lines().map(str::trim).collect()
}

/// Split a line into words on whitespace, grouping quoted text.
///
/// Quote characters are consumed. A quote of the other kind inside a quoted span is kept
/// literally. An unterminated quote runs to the end of the line.
#[must_use]
pub fn tokenize(line: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut in_word = false;

    for c in line.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => current.push(c),
            None if c == '"' || c == '\'' => {
                quote = Some(c);
                in_word = true;
            }
            None if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            None => {
                current.push(c);
                in_word = true;
            }
        }
    }
    if in_word {
        words.push(current);
    }
    words
}

fn is_override_flag(token: &str) -> bool {
    let flag = token.split_once('=').map_or(token, |(flag, _)| flag);
    OVERRIDE_FLAGS.contains(&flag)
}

/// Parse a standalone `NAME=value` assignment.
///
/// The name must be an identifier directly followed by `=`. Lines carrying an override flag
/// are workflow invocations, not assignments. Quotes around the value are stripped.
#[must_use]
pub fn parse_assignment(line: &str) -> Option<(&str, &str)> {
    let (name, value) = line.split_once('=')?;
    if !is_identifier(name) || line.split_whitespace().any(is_override_flag) {
        return None;
    }
    Some((name, value.trim().trim_matches(|c: char| c == '"' || c == '\'')))
}

/// What a single trimmed script line is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// Blank, comment or shebang.
    Skip,
    /// A block keyword on its own line.
    Keyword,
    Assignment { name: &'a str, value: &'a str },
    /// Condition text after `if `.
    If(&'a str),
    /// The full `for` header line.
    For(&'a str),
    /// Condition text after `while `.
    While(&'a str),
    Command(&'a str),
}

impl<'a> LineKind<'a> {
    #[must_use]
    pub fn classify(line: &'a str) -> Self {
        if line.is_empty() || line.starts_with('#') {
            return LineKind::Skip;
        }
        if KEYWORDS.contains(&line) {
            return LineKind::Keyword;
        }
        if let Some((name, value)) = parse_assignment(line) {
            return LineKind::Assignment { name, value };
        }
        if let Some(condition) = line.strip_prefix("if ") {
            return LineKind::If(condition.trim());
        }
        if line.starts_with("for ") {
            return LineKind::For(line);
        }
        if let Some(condition) = line.strip_prefix("while ") {
            return LineKind::While(condition.trim());
        }
        LineKind::Command(line)
    }
}

/// A parsed `for NAME in v1 v2 ...` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForHeader {
    pub variable: String,
    /// Raw value words, not yet substituted.
    pub values: Vec<String>,
}

impl ForHeader {
    /// Parse a header line. A trailing `do` is dropped.
    ///
    /// Returns `None` when the line is not `for <identifier> in ...`.
    #[must_use]
    pub fn parse(line: &str) -> Option<Self> {
        let mut words = tokenize(line).into_iter();
        if words.next()? != "for" {
            return None;
        }
        let variable = words.next()?;
        if !is_identifier(&variable) || words.next()? != "in" {
            return None;
        }
        let mut values: Vec<String> = words.collect();
        if values.last().is_some_and(|v| v == "do") {
            values.pop();
        }
        Some(ForHeader { variable, values })
    }
}

/// Rebuild an `echo` line without its argument quoting.
#[must_use]
pub fn strip_echo_quotes(line: &str) -> String {
    tokenize(line).join(" ")
}
