//! Path classification and normalization for substituted arguments.

use std::path::MAIN_SEPARATOR;

/// Heuristic check for whether an argument is a filesystem path rather than a flag.
///
/// Strings of at most three characters that start with `/` or `\` are treated as short
/// OS flags (`/?`, `/C`) and never count as paths.
#[must_use]
pub fn is_path_like(s: &str) -> bool {
    if s.len() <= 3 && (s.starts_with('/') || s.starts_with('\\')) {
        return false;
    }

    if has_drive_prefix(s) {
        return true;
    }

    if s.starts_with("./") || s.starts_with("../") {
        return true;
    }

    if s.starts_with('/') && s.len() > 3 {
        if s.matches('/').count() > 1 {
            return true;
        }
        // Single segment: a dotted name or anything longer than a short flag
        if s.contains('.') || s.len() > 4 {
            return true;
        }
    }

    if s.contains('\\') {
        return true;
    }

    s.matches(['/', '\\']).count() > 1
}

fn has_drive_prefix(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

/// Rewrite separators to the host's native separator and clean the result lexically.
#[must_use]
pub fn normalize_path(path: &str) -> String {
    normalize_path_with(path, MAIN_SEPARATOR)
}

/// Same as [`normalize_path`] with an explicit target separator.
#[must_use]
pub fn normalize_path_with(path: &str, separator: char) -> String {
    let rewritten = if separator == '\\' {
        path.replace('/', "\\")
    } else {
        path.replace('\\', "/")
    };
    clean(&rewritten, separator)
}

/// Lexically resolve `.` and `..` elements and collapse repeated separators.
///
/// A leading drive prefix (`C:`) is kept as-is. `..` never climbs above a root.
#[must_use]
pub fn clean(path: &str, separator: char) -> String {
    let (volume, rest) = split_volume(path, separator);
    if rest.is_empty() {
        return if volume.is_empty() {
            ".".to_string()
        } else {
            volume.to_string()
        };
    }

    let rooted = rest.starts_with(separator);
    let mut parts: Vec<&str> = Vec::new();
    for part in rest.split(separator) {
        match part {
            "" | "." => {}
            ".." => match parts.last().copied() {
                Some(last) if last != ".." => {
                    parts.pop();
                }
                _ if rooted => {}
                _ => parts.push(".."),
            },
            other => parts.push(other),
        }
    }

    let sep = separator.to_string();
    let joined = parts.join(&sep);
    let body = match (rooted, joined.is_empty()) {
        (true, _) => format!("{sep}{joined}"),
        (false, true) => ".".to_string(),
        (false, false) => joined,
    };
    format!("{volume}{body}")
}

fn split_volume(path: &str, separator: char) -> (&str, &str) {
    if has_drive_prefix(path) {
        return path.split_at(2);
    }
    // UNC share prefix on Windows-style paths keeps its double separator
    if separator == '\\' && path.starts_with("\\\\") && path.len() > 2 {
        return path.split_at(1);
    }
    ("", path)
}
