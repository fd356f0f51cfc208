//! Lexical path handling shared by every backend.
//!
//! Paths here are plain `/`-separated strings, never `std::path::Path`: the
//! object store has no notion of an OS path, and the local backend keeps its
//! working directory provider-relative. Nothing in this module touches a
//! filesystem.

pub const SEPARATOR: char = '/';
pub const ROOT: &str = "/";

/// Lexically normalize `path`.
///
/// Collapses duplicate separators, drops `.` segments and resolves `..`
/// against the preceding segment. `..` never rises above the root of an
/// absolute path; for relative paths leading `..` segments are kept. An
/// empty result becomes `/` for absolute paths and `.` otherwise. Trailing
/// separators are removed.
pub fn clean(path: &str) -> String {
    if path.is_empty() {
        return ".".to_string();
    }

    let rooted = path.starts_with(SEPARATOR);
    let mut parts: Vec<&str> = Vec::new();

    for part in path.split(SEPARATOR) {
        match part {
            "" | "." => {}
            ".." => match parts.last() {
                Some(&last) if last != ".." => {
                    parts.pop();
                }
                _ if rooted => {}
                _ => parts.push(".."),
            },
            _ => parts.push(part),
        }
    }

    let joined = parts.join("/");
    match (rooted, joined.is_empty()) {
        (true, _) => format!("{ROOT}{joined}"),
        (false, true) => ".".to_string(),
        (false, false) => joined,
    }
}

/// Join `target` onto `base` and clean the result.
///
/// `target` is always appended, even when it starts with a separator.
pub fn join(base: &str, target: &str) -> String {
    clean(&format!("{base}{SEPARATOR}{target}"))
}

/// Last segment of `path`, ignoring trailing separators.
pub fn base_name(path: &str) -> &str {
    path.trim_end_matches(SEPARATOR)
        .rsplit(SEPARATOR)
        .next()
        .unwrap_or("")
}

/// Everything before the last segment of a cleaned path, `/` for top-level
/// entries of an absolute path and `.` for a single relative segment.
pub fn parent(path: &str) -> String {
    let cleaned = clean(path);
    match cleaned.rfind(SEPARATOR) {
        Some(0) => ROOT.to_string(),
        Some(idx) => cleaned[..idx].to_string(),
        None => ".".to_string(),
    }
}
