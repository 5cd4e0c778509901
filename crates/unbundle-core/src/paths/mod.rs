//! Path handling: turning untrusted source-map paths and bundle URLs into
//! safe relative filesystem names under the output root.

mod join;
mod sanitize;
mod url_name;

pub use join::posix_join;
pub use sanitize::{sanitize_file_name, sanitize_source_path, SanitizedPath};
pub use url_name::{bundle_file_name, DEFAULT_BUNDLE_FILE_NAME};
