//! Where a reconstructed source ends up when its target already exists.

use std::fs;
use std::path::{Path, PathBuf};

use crate::paths::sanitize_file_name;

/// Outcome of checking a target path before writing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placement {
    /// Nothing readable there yet (or the read failed): write at the target.
    Target(PathBuf),
    /// Same content already on disk: nothing to write.
    Unchanged(PathBuf),
    /// Different content on disk: write next to it under a bundle-specific name.
    Sibling(PathBuf),
}

/// Decides where `content` for `target` goes. Existing files are never
/// overwritten with different content.
pub fn place(target: &Path, content: &str, bundle_file_name: &str) -> Placement {
    match fs::read_to_string(target) {
        Ok(existing) if existing == content => Placement::Unchanged(target.to_path_buf()),
        Ok(_) => Placement::Sibling(sibling_path(target, bundle_file_name)),
        Err(_) => Placement::Target(target.to_path_buf()),
    }
}

/// `dir/name.ext` -> `dir/name.<bundle>.ext`.
pub fn sibling_path(target: &Path, bundle_file_name: &str) -> PathBuf {
    let file_name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let (stem, ext) = split_extension(&file_name);
    let new_name = format!("{}.{}{}", stem, sanitize_file_name(bundle_file_name), ext);
    target.with_file_name(new_name)
}

/// Splits at the last dot unless it is the first character (`.env` has no extension).
fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(i) if i > 0 => (&name[..i], &name[i..]),
        _ => (name, ""),
    }
}
