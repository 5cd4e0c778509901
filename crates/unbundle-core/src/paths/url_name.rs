//! Bundle file name from a bundle URL.

use super::sanitize::sanitize_file_name;

/// File name used when the URL has no usable last path segment.
pub const DEFAULT_BUNDLE_FILE_NAME: &str = "bundle.js";

/// Sanitized last path segment of `url` (query and fragment ignored).
///
/// Falls back to `bundle.js` if the URL cannot be parsed or its path is empty.
pub fn bundle_file_name(url: &str) -> String {
    let last = url::Url::parse(url).ok().and_then(|parsed| {
        parsed
            .path()
            .split('/')
            .filter(|s| !s.is_empty())
            .last()
            .map(str::to_string)
    });
    sanitize_file_name(last.as_deref().unwrap_or(DEFAULT_BUNDLE_FILE_NAME))
}
