//! Writing bundles and reconstructed sources under the output root.
//!
//! Per bundle:
//! - no map: the bundle goes to `<root>/not_mapped/<file>`;
//! - map that is not valid JSON: `<root>/<file>.map` plus `<root>/<file>` with
//!   its reference rewritten to that map;
//! - parsed map: every embedded source with content is written at its
//!   sanitized path under `<root>`, never clobbering different content.
//!
//! Nothing is ever deleted; directory creation tolerates existing directories.

mod collision;
mod locks;

pub use collision::{place, sibling_path, Placement};
pub use locks::PathLocks;

use anyhow::{Context, Result};
use indexmap::IndexMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::paths::{bundle_file_name, sanitize_source_path};
use crate::source_map::{parse_source_map, rewrite_map_reference, ParsedSourceMap};

/// Subdirectory for bundles without a source map.
pub const NOT_MAPPED_DIR: &str = "not_mapped";

/// Counts from one `write_bundles` call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteReport {
    /// Bundles written to `not_mapped/`.
    pub unmapped: usize,
    /// Bundles whose map was not valid JSON (bundle + map kept at the root).
    pub degraded: usize,
    /// Source files written (including siblings).
    pub sources_written: usize,
    /// Sources already on disk with identical content.
    pub sources_unchanged: usize,
    /// Sources dropped because their path sanitized to nothing.
    pub sources_skipped: usize,
    /// Sources written to a sibling path because the target held other content.
    pub collisions: usize,
}

/// Writes into one output root. Collision checks and writes for a target path
/// happen under that path's lock.
#[derive(Debug)]
pub struct DistWriter {
    root: PathBuf,
    locks: PathLocks,
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).with_context(|| format!("write {}", path.display()))
}

fn create_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).with_context(|| format!("create directory {}", path.display()))
}

impl DistWriter {
    /// Creates `root` and `root/not_mapped`.
    pub fn create(root: &Path) -> Result<Self> {
        create_dir(root)?;
        create_dir(&root.join(NOT_MAPPED_DIR))?;
        Ok(Self {
            root: root.to_path_buf(),
            locks: PathLocks::new(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Writes one bundle according to whether it has a map and whether the map parses.
    pub fn write_bundle(
        &self,
        bundle_url: &str,
        bundle_text: &str,
        source_map: Option<&str>,
        report: &mut WriteReport,
    ) -> Result<()> {
        let file_name = bundle_file_name(bundle_url);

        let Some(map_text) = source_map else {
            let out = self.root.join(NOT_MAPPED_DIR).join(&file_name);
            write_file(&out, bundle_text)?;
            tracing::debug!(url = bundle_url, path = %out.display(), "wrote unmapped bundle");
            report.unmapped += 1;
            return Ok(());
        };

        match parse_source_map(map_text) {
            Ok(parsed) => self.explode_sources(&parsed, &file_name, report),
            Err(e) => {
                tracing::warn!(url = bundle_url, "source map is not valid JSON: {}", e);
                let map_file_name = format!("{}.map", file_name);
                write_file(&self.root.join(&map_file_name), map_text)?;
                let rewritten = rewrite_map_reference(bundle_text, &map_file_name);
                write_file(&self.root.join(&file_name), &rewritten)?;
                report.degraded += 1;
                Ok(())
            }
        }
    }

    fn explode_sources(
        &self,
        parsed: &ParsedSourceMap,
        bundle_file_name: &str,
        report: &mut WriteReport,
    ) -> Result<()> {
        for source in parsed.embedded_sources() {
            let Some(rel) = sanitize_source_path(&source.logical_path) else {
                tracing::debug!(source = %source.logical_path, "source path sanitized to nothing");
                report.sources_skipped += 1;
                continue;
            };
            let target = self.root.join(rel.as_path());
            if let Some(parent) = target.parent() {
                create_dir(parent)?;
            }

            self.locks.with_lock(&target, || -> Result<()> {
                match place(&target, source.content, bundle_file_name) {
                    Placement::Unchanged(_) => {
                        report.sources_unchanged += 1;
                    }
                    Placement::Target(path) => {
                        write_file(&path, source.content)?;
                        report.sources_written += 1;
                    }
                    Placement::Sibling(path) => {
                        tracing::debug!(
                            target = %target.display(),
                            sibling = %path.display(),
                            "content differs from existing file, writing sibling"
                        );
                        write_file(&path, source.content)?;
                        report.sources_written += 1;
                        report.collisions += 1;
                    }
                }
                Ok(())
            })?;
        }
        Ok(())
    }
}

/// Writes every bundle in `bundles` under `root`, in their order, using
/// `source_maps` (keyed by bundle URL) where present. On a shared source path
/// the earlier bundle keeps the canonical file. A filesystem error aborts the
/// run.
pub fn write_bundles(
    root: &Path,
    bundles: &IndexMap<String, String>,
    source_maps: &IndexMap<String, String>,
) -> Result<WriteReport> {
    let writer = DistWriter::create(root)?;
    let mut report = WriteReport::default();
    for (url, text) in bundles {
        let map = source_maps.get(url).map(String::as_str);
        writer.write_bundle(url, text, map, &mut report)?;
    }
    tracing::info!(?report, root = %root.display(), "dist written");
    Ok(report)
}
