//! Arithmetic expansion and condition primitives.
//!
//! Arithmetic has no operator precedence: `2 + 3 * 4` is `(2 + 3) * 4`. Existing scripts
//! depend on this order.

use std::cmp::Ordering;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::substitution::{Scope, is_identifier};

static ARITHMETIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\(\(([^)]+)\)\)").expect("arithmetic pattern is valid"));

static POSITIONAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$(\d+)").expect("positional pattern is valid"));

// `${name}`, `$name` or a bare word, in that order of preference.
static ARITHMETIC_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{(\w+)\}|\$([A-Za-z_]\w*)|\b([A-Za-z_]\w*)\b")
        .expect("arithmetic name pattern is valid")
});

const ARITHMETIC_OPERATORS: [char; 5] = ['+', '-', '*', '/', '%'];

/// Replace `$1`, `$2`, ... with positional parameters. Missing parameters and `$0` become
/// the empty string.
#[must_use]
pub fn substitute_positional(text: &str, params: &[String]) -> String {
    POSITIONAL
        .replace_all(text, |caps: &Captures| positional(params, &caps[1]).to_string())
        .into_owned()
}

fn positional<'a>(params: &'a [String], index: &str) -> &'a str {
    index
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|n| params.get(n))
        .map_or("", String::as_str)
}

/// Expand every `$((expr))` in `line`.
///
/// Inside the expression positional parameters are replaced first, then variable names
/// with or without a `$` prefix. Unknown names are left for the evaluator, which ignores
/// them.
#[must_use]
pub fn substitute_arithmetic(line: &str, variables: &Scope, params: &[String]) -> String {
    ARITHMETIC
        .replace_all(line, |caps: &Captures| {
            let expr = substitute_positional(caps[1].trim(), params);
            let expr = ARITHMETIC_NAME.replace_all(&expr, |names: &Captures| {
                let name = names
                    .get(1)
                    .or_else(|| names.get(2))
                    .or_else(|| names.get(3))
                    .map_or("", |m| m.as_str());
                variables
                    .get(name)
                    .cloned()
                    .unwrap_or_else(|| names[0].to_string())
            });
            evaluate_arithmetic(&expr).to_string()
        })
        .into_owned()
}

fn split_arithmetic(expr: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    for (i, c) in expr.char_indices() {
        if ARITHMETIC_OPERATORS.contains(&c) {
            if start < i {
                parts.push(expr[start..i].trim());
            }
            parts.push(&expr[i..i + 1]);
            start = i + 1;
        }
    }
    if start < expr.len() {
        parts.push(expr[start..].trim());
    }
    parts
}

/// Evaluate an integer expression strictly left to right.
///
/// A leading operand that is not a number makes the result `0`. Later operands that are not
/// numbers are skipped along with their operator, as is division or modulo by zero.
#[must_use]
pub fn evaluate_arithmetic(expr: &str) -> i64 {
    let expr = expr.trim();
    if let Ok(value) = expr.parse::<i64>() {
        return value;
    }

    let parts = split_arithmetic(expr);
    let Some(Ok(mut result)) = parts.first().map(|first| first.parse::<i64>()) else {
        return 0;
    };
    for pair in parts[1..].chunks_exact(2) {
        let (op, operand) = (pair[0], pair[1]);
        let Ok(value) = operand.parse::<i64>() else {
            continue;
        };
        result = match op {
            "+" => result.wrapping_add(value),
            "-" => result.wrapping_sub(value),
            "*" => result.wrapping_mul(value),
            "/" if value != 0 => result.wrapping_div(value),
            "%" if value != 0 => result.wrapping_rem(value),
            _ => result,
        };
    }
    result
}

/// A comparison operator in a condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    LessEqual,
    GreaterEqual,
    Equal,
    NotEqual,
    Less,
    Greater,
}

/// Operators in the order they are tried when splitting a condition. `=` is a synonym of `==`.
const COMPARISONS: [(&str, Comparison); 7] = [
    ("<=", Comparison::LessEqual),
    (">=", Comparison::GreaterEqual),
    ("==", Comparison::Equal),
    ("!=", Comparison::NotEqual),
    ("<", Comparison::Less),
    (">", Comparison::Greater),
    ("=", Comparison::Equal),
];

impl Comparison {
    /// Compare numerically when both sides are integers, lexically otherwise.
    #[must_use]
    pub fn apply(self, left: &str, right: &str) -> bool {
        let ordering = match (left.parse::<i64>(), right.parse::<i64>()) {
            (Ok(l), Ok(r)) => l.cmp(&r),
            _ => left.cmp(right),
        };
        match self {
            Comparison::LessEqual => ordering != Ordering::Greater,
            Comparison::GreaterEqual => ordering != Ordering::Less,
            Comparison::Equal => ordering == Ordering::Equal,
            Comparison::NotEqual => ordering != Ordering::Equal,
            Comparison::Less => ordering == Ordering::Less,
            Comparison::Greater => ordering == Ordering::Greater,
        }
    }
}

/// Split a condition on the first operator, in priority order, that occurs after the
/// first character. Operands are trimmed and unquoted.
#[must_use]
pub fn split_comparison(condition: &str) -> Option<(&str, Comparison, &str)> {
    COMPARISONS.iter().find_map(|&(token, op)| {
        let idx = condition.find(token).filter(|&idx| idx > 0)?;
        let left = unquote(condition[..idx].trim());
        let right = unquote(condition[idx + token.len()..].trim());
        Some((left, op, right))
    })
}

/// Strip `[ ... ]` test-expression brackets.
#[must_use]
pub fn strip_brackets(condition: &str) -> &str {
    condition.trim().trim_matches(|c: char| c == '[' || c == ']').trim()
}

#[must_use]
pub fn unquote(text: &str) -> &str {
    text.trim_matches(|c: char| c == '"' || c == '\'')
}

/// A `$name`, `${name}` or `$N` reference standing alone, possibly quoted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reference<'a> {
    Variable(&'a str),
    Positional(&'a str),
}

impl<'a> Reference<'a> {
    #[must_use]
    pub fn parse(text: &'a str) -> Option<Self> {
        let body = unquote(text.trim()).strip_prefix('$')?;
        let name = body
            .strip_prefix('{')
            .and_then(|b| b.strip_suffix('}'))
            .unwrap_or(body);
        if is_identifier(name) {
            Some(Reference::Variable(name))
        } else if !name.is_empty() && name.bytes().all(|b| b.is_ascii_digit()) {
            Some(Reference::Positional(name))
        } else {
            None
        }
    }

    /// Look the reference up. Unbound names resolve to the empty string.
    #[must_use]
    pub fn resolve<'s>(self, variables: &'s Scope, params: &'s [String]) -> &'s str {
        match self {
            Reference::Variable(name) => variables.get(name).map_or("", String::as_str),
            Reference::Positional(index) => positional(params, index),
        }
    }
}
