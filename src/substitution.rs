//! Placeholder detection and replacement shared by workflow templates and scripts.
//!
//! Two reference syntaxes exist:
//!
//! - `{name}` (brace form) resolves against the protected scope, which only
//!   ever contains a workflow's declared variables.
//! - `$name` / `${name}` (sigil form) resolves against the overridable scope,
//!   where caller overrides replace declared values.
//!
//! Text is scanned once from left to right. A substituted value is copied into
//! the output verbatim and never re-scanned, so a value that happens to contain
//! `{x}` or `$x` stays literal.

use std::collections::{BTreeSet, HashMap};

/// Mapping from variable name to value.
pub type Scope = HashMap<String, String>;

/// What to do with a reference that has no binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unbound {
    /// Leave the original reference text in place.
    Keep,
    /// Replace the reference with the empty string.
    Empty,
}

/// All names referenced by a piece of text, split by syntax.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct References {
    pub braces: BTreeSet<String>,
    pub sigils: BTreeSet<String>,
}

impl References {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.braces.is_empty() && self.sigils.is_empty()
    }

    /// Merge another set of references into this one.
    pub fn extend(&mut self, other: References) {
        self.braces.extend(other.braces);
        self.sigils.extend(other.sigils);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Segment<'a> {
    Text(&'a str),
    Brace { name: &'a str, raw: &'a str },
    Sigil { name: &'a str, raw: &'a str },
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

fn is_ident_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Returns true if `name` is a valid sigil-form variable name.
#[must_use]
pub fn is_identifier(name: &str) -> bool {
    let bytes = name.as_bytes();
    !bytes.is_empty() && is_ident_start(bytes[0]) && bytes[1..].iter().all(|&b| is_ident_char(b))
}

/// Try to read a sigil reference starting at `start` (which points at `$`).
/// Returns the name and the end offset of the whole reference.
fn sigil_at(text: &str, start: usize) -> Option<(&str, usize)> {
    let bytes = text.as_bytes();
    let next = *bytes.get(start + 1)?;
    if next == b'{' {
        let close = text[start + 2..].find('}')? + start + 2;
        let name = &text[start + 2..close];
        return is_identifier(name).then_some((name, close + 1));
    }
    if !is_ident_start(next) {
        return None;
    }
    let mut end = start + 2;
    while end < bytes.len() && is_ident_char(bytes[end]) {
        end += 1;
    }
    Some((&text[start + 1..end], end))
}

/// Try to read a brace reference starting at `start` (which points at `{`).
/// The span runs to the next `}`; an inner `{` restarts the span there.
fn brace_at(text: &str, start: usize) -> Option<(&str, usize)> {
    let rest = &text[start + 1..];
    let close = rest.find('}')?;
    let name = &rest[..close];
    if name.is_empty() || name.contains('{') {
        return None;
    }
    Some((name, start + 1 + close + 1))
}

fn segments(text: &str) -> Vec<Segment<'_>> {
    let bytes = text.as_bytes();
    let mut out = Vec::new();
    let mut literal_start = 0;
    let mut i = 0;
    while i < bytes.len() {
        let found = match bytes[i] {
            b'$' => sigil_at(text, i).map(|(name, end)| {
                (
                    Segment::Sigil {
                        name,
                        raw: &text[i..end],
                    },
                    end,
                )
            }),
            b'{' => brace_at(text, i).map(|(name, end)| {
                (
                    Segment::Brace {
                        name,
                        raw: &text[i..end],
                    },
                    end,
                )
            }),
            _ => None,
        };
        match found {
            Some((segment, end)) => {
                if literal_start < i {
                    out.push(Segment::Text(&text[literal_start..i]));
                }
                out.push(segment);
                i = end;
                literal_start = end;
            }
            None => i += 1,
        }
    }
    if literal_start < bytes.len() {
        out.push(Segment::Text(&text[literal_start..]));
    }
    out
}

/// Collect every `{name}`, `$name` and `${name}` reference in `text`.
///
/// Positional parameters (`$1`, `$2`, ...) are not variable references.
#[must_use]
pub fn extract_references(text: &str) -> References {
    let mut refs = References::default();
    for segment in segments(text) {
        match segment {
            Segment::Brace { name, .. } => {
                refs.braces.insert(name.to_string());
            }
            Segment::Sigil { name, .. } => {
                refs.sigils.insert(name.to_string());
            }
            Segment::Text(_) => {}
        }
    }
    refs
}

fn resolve<'a>(scope: Option<&'a Scope>, name: &str, raw: &'a str, unbound: Unbound) -> &'a str {
    match scope.and_then(|s| s.get(name)) {
        Some(value) => value,
        None if unbound == Unbound::Keep => raw,
        None => "",
    }
}

/// Replace references in `text` in a single pass.
///
/// Brace references resolve against `braces`; when `braces` is `None` brace
/// spans are plain text. Sigil references resolve against `sigils`.
#[must_use]
pub fn substitute(text: &str, braces: Option<&Scope>, sigils: &Scope, unbound: Unbound) -> String {
    let mut out = String::with_capacity(text.len());
    for segment in segments(text) {
        match segment {
            Segment::Text(t) => out.push_str(t),
            Segment::Brace { name, raw } if braces.is_some() => {
                out.push_str(resolve(braces, name, raw, unbound));
            }
            Segment::Brace { raw, .. } => out.push_str(raw),
            Segment::Sigil { name, raw } => out.push_str(resolve(Some(sigils), name, raw, unbound)),
        }
    }
    out
}
