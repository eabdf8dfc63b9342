//! Caller-supplied `key=value` overrides.
//!
//! `-s`, `--set` and the legacy `--args` spelling are interchangeable.

use crate::substitution::Scope;

/// Flags that introduce an override pair.
pub const OVERRIDE_FLAGS: [&str; 3] = ["-s", "--set", "--args"];

/// Split `key=value` into its parts, stripping quotes around the value.
///
/// Returns `None` when there is no `=`.
#[must_use]
pub fn parse_pair(pair: &str) -> Option<(String, String)> {
    let (key, value) = pair.split_once('=')?;
    let value = value.trim_matches(|c: char| c == '"' || c == '\'');
    Some((key.to_string(), value.to_string()))
}

/// `clap` value parser for override pairs.
///
/// # Errors
///
/// Returns a message when the argument has no `=`.
pub fn parse_override_arg(pair: &str) -> Result<(String, String), String> {
    parse_pair(pair).ok_or_else(|| format!("expected <var>=<value>, got `{pair}`"))
}

/// Pull every override pair out of an argument list.
///
/// Returns the overrides and the remaining arguments in their original order. A flag with no
/// following value is dropped; a following value without `=` is consumed and ignored.
#[must_use]
pub fn parse_overrides(args: &[String]) -> (Scope, Vec<String>) {
    let mut overrides = Scope::new();
    let mut remaining = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if OVERRIDE_FLAGS.contains(&arg.as_str()) {
            if let Some((key, value)) = iter.next().and_then(|pair| parse_pair(pair)) {
                overrides.insert(key, value);
            }
        } else if let Some(pair) = arg.strip_prefix("--set=") {
            if let Some((key, value)) = parse_pair(pair) {
                overrides.insert(key, value);
            }
        } else {
            remaining.push(arg.clone());
        }
    }
    (overrides, remaining)
}
