//! Source path and file name sanitization.
//!
//! A [`SanitizedPath`] is relative, has no `..` or `.` segments, no segment
//! starting with `.`, and only `[a-zA-Z0-9._-]` inside segments. Joining it to
//! an output root can never leave that root.

use std::fmt;
use std::path::{Path, PathBuf, MAIN_SEPARATOR_STR};

/// Longest file name produced by [`sanitize_file_name`].
const FILE_NAME_MAX: usize = 200;

/// A relative path that is safe to join onto the output root.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SanitizedPath(PathBuf);

impl SanitizedPath {
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    pub fn into_path_buf(self) -> PathBuf {
        self.0
    }
}

impl AsRef<Path> for SanitizedPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for SanitizedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

fn is_allowed(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-'
}

fn replace_disallowed(s: &str) -> String {
    s.chars()
        .map(|c| if is_allowed(c) { c } else { '_' })
        .collect()
}

/// Strips a leading `<letters>://` scheme.
fn strip_scheme(s: &str) -> &str {
    if let Some(idx) = s.find("://") {
        let scheme = &s[..idx];
        if !scheme.is_empty() && scheme.chars().all(|c| c.is_ascii_alphabetic()) {
            return &s[idx + 3..];
        }
    }
    s
}

/// Strips a leading Windows drive (`C:/`).
fn strip_drive(s: &str) -> &str {
    let b = s.as_bytes();
    if b.len() >= 3 && b[0].is_ascii_alphabetic() && b[1] == b':' && b[2] == b'/' {
        &s[3..]
    } else {
        s
    }
}

/// Strips one leading `.` followed by one or more `/`.
fn strip_dot_slash(s: &str) -> &str {
    match s.strip_prefix('.') {
        Some(rest) if rest.starts_with('/') => rest.trim_start_matches('/'),
        _ => s,
    }
}

fn clean_segment(segment: &str, index: usize) -> String {
    let mut p = replace_disallowed(segment.trim_start_matches('.'));
    if p.is_empty() {
        p = format!("_source_{}", index);
    }
    if p.starts_with('.') {
        p.replace_range(..1, "_");
    }
    p
}

/// Turns an arbitrary source path (`webpack:///./src/a.ts`, `C:\x\y.js`,
/// `../../etc/passwd`, ...) into a safe relative path.
///
/// Parent traversal is never honored: `..` segments are dropped, not resolved.
/// Returns `None` when nothing usable is left.
pub fn sanitize_source_path(raw: &str) -> Option<SanitizedPath> {
    if raw.is_empty() {
        return None;
    }

    let normalized = raw.replace('\\', "/");
    let mut s: &str = &normalized;
    s = s.strip_prefix("webpack://").unwrap_or(s);
    s = strip_scheme(s);
    s = strip_drive(s);
    s = strip_dot_slash(s);
    s = s.trim_start_matches('/');

    let cleaned: Vec<String> = s
        .split('/')
        .filter(|part| !part.is_empty() && *part != "." && *part != "..")
        .enumerate()
        .map(|(i, part)| clean_segment(part, i))
        .collect();

    if cleaned.is_empty() {
        return None;
    }
    let joined = cleaned.join(MAIN_SEPARATOR_STR);
    Some(SanitizedPath(PathBuf::from(joined)))
}

/// Sanitizes a single file name: disallowed characters become `_` and the
/// result is cut to 200 characters.
pub fn sanitize_file_name(name: &str) -> String {
    let mut out = replace_disallowed(name);
    if out.len() > FILE_NAME_MAX {
        // Only ASCII remains after replacement, so any byte index is a boundary.
        out.truncate(FILE_NAME_MAX);
    }
    out
}
