//! One run: page -> bundles -> source maps -> files on disk -> formatter.

use anyhow::Result;
use std::io::Write;

use crate::collect::collect_bundles;
use crate::config::UnbundleConfig;
use crate::dist::{write_bundles, WriteReport};
use crate::fetch::TextFetcher;
use crate::format::DirectoryFormatter;
use crate::source_map::{resolve_all, ResolveOptions};

/// Characters of map text shown per bundle by [`inspect`].
const PREVIEW_CHARS: usize = 10;

/// Outcome of [`run`].
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub bundles: usize,
    pub mapped: usize,
    pub failed_fetches: usize,
    pub write: WriteReport,
}

/// A mapped bundle and the start of its map text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapPreview {
    pub url: String,
    pub preview: String,
}

/// Full run. Progress lines go to `out`. Formatter failures are logged and
/// do not fail the run; page fetch and filesystem errors do.
pub fn run(
    cfg: &UnbundleConfig,
    fetcher: &dyn TextFetcher,
    formatter: &dyn DirectoryFormatter,
    out: &mut dyn Write,
) -> Result<RunReport> {
    writeln!(out, "Downloading bundles and source maps...")?;
    let collected = collect_bundles(fetcher, cfg)?;
    writeln!(out, "Downloaded {} bundles.", collected.bundles.len())?;

    let maps = resolve_all(fetcher, &collected.bundles, &ResolveOptions::from_config(cfg)).maps;

    writeln!(out, "Writing bundles and source maps to disk...")?;
    let write = write_bundles(&cfg.dist_dir, &collected.bundles, &maps)?;

    writeln!(out, "Formatting {}/...", cfg.dist_dir.display())?;
    if let Err(e) = formatter.format_directory(&cfg.dist_dir) {
        tracing::warn!("formatting {} failed: {:#}", cfg.dist_dir.display(), e);
        eprintln!("warning: formatting failed: {:#}", e);
    }

    let report = RunReport {
        bundles: collected.bundles.len(),
        mapped: maps.len(),
        failed_fetches: collected.failed.len(),
        write,
    };
    tracing::info!(?report, "run finished");
    Ok(report)
}

/// Summary variant: resolves maps without writing anything and prints
/// `<mapped>/<total> bundles have source maps` plus one preview line per
/// mapped bundle.
pub fn inspect(
    cfg: &UnbundleConfig,
    fetcher: &dyn TextFetcher,
    out: &mut dyn Write,
) -> Result<Vec<MapPreview>> {
    let collected = collect_bundles(fetcher, cfg)?;
    let maps = resolve_all(fetcher, &collected.bundles, &ResolveOptions::from_config(cfg)).maps;

    writeln!(
        out,
        "{}/{} bundles have source maps",
        maps.len(),
        collected.bundles.len()
    )?;
    let previews: Vec<MapPreview> = maps
        .into_iter()
        .map(|(url, text)| MapPreview {
            preview: text.chars().take(PREVIEW_CHARS).collect(),
            url,
        })
        .collect();
    for p in &previews {
        writeln!(out, "{} {}", p.url, p.preview)?;
    }
    Ok(previews)
}
