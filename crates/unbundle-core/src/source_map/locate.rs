//! Locating and fetching a bundle's source map.

use indexmap::IndexMap;

use crate::config::UnbundleConfig;
use crate::fetch::{run_bounded, TextFetcher};

/// Single-line comment marker that introduces a map reference.
pub const MAP_REFERENCE_MARKER: &str = "//# sourceMappingURL=";

const MAP_SUFFIX: &str = ".map";

fn is_line_break(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

/// Returns the map URL referenced by the first `//# sourceMappingURL=` comment
/// that carries one.
///
/// The value runs from the marker to the last `.map` on the same line and must
/// have at least one character before that suffix. Occurrences without such a
/// value are skipped and the scan continues left to right.
pub fn extract_map_reference(bundle_text: &str) -> Option<&str> {
    let mut from = 0;
    while let Some(pos) = bundle_text[from..].find(MAP_REFERENCE_MARKER) {
        let start = from + pos + MAP_REFERENCE_MARKER.len();
        let rest = &bundle_text[start..];
        let line = match rest.find(is_line_break) {
            Some(end) => &rest[..end],
            None => rest,
        };
        if let Some(idx) = line.rfind(MAP_SUFFIX) {
            if idx > 0 {
                return Some(&line[..idx + MAP_SUFFIX.len()]);
            }
        }
        from = start;
    }
    None
}

/// Second-chance URL for a map whose reference could not be fetched: the part
/// of the reference after `marker` appended to `base`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackStrategy {
    pub marker: String,
    pub base: String,
}

impl FallbackStrategy {
    /// `None` when the reference does not contain the marker.
    pub fn fallback_url(&self, reference: &str) -> Option<String> {
        let (_, rest) = reference.split_once(self.marker.as_str())?;
        Some(format!("{}{}", self.base, rest))
    }
}

/// Knobs for [`resolve_all`].
#[derive(Debug, Clone)]
pub struct ResolveOptions {
    pub fallback: FallbackStrategy,
    /// URL substrings of bundles that are expected to have no map.
    pub vendor_markers: Vec<String>,
    pub max_concurrent: usize,
}

impl ResolveOptions {
    pub fn from_config(cfg: &UnbundleConfig) -> Self {
        Self {
            fallback: FallbackStrategy {
                marker: cfg.fallback_marker.clone(),
                base: cfg.fallback_base.clone(),
            },
            vendor_markers: cfg.vendor_markers.clone(),
            max_concurrent: cfg.max_concurrent_fetches,
        }
    }

    fn is_vendor(&self, url: &str) -> bool {
        self.vendor_markers
            .iter()
            .any(|m| !m.is_empty() && url.contains(m.as_str()))
    }
}

/// Fetches the source map referenced by `bundle_text`.
///
/// The reference is fetched as-is first. If that fails (transport error,
/// non-2xx, non-text or empty body) the fallback URL is tried once. Returns
/// `None` when there is no reference or neither attempt yields text.
pub fn resolve_source_map(
    fetcher: &dyn TextFetcher,
    bundle_text: &str,
    fallback: &FallbackStrategy,
) -> Option<String> {
    let reference = extract_map_reference(bundle_text)?;

    match fetcher.fetch(reference) {
        Ok(text) if !text.is_empty() => return Some(text),
        Ok(_) => tracing::debug!(url = reference, "source map body empty, trying fallback"),
        Err(e) => tracing::debug!(url = reference, "source map fetch failed: {}", e),
    }

    let Some(alt) = fallback.fallback_url(reference) else {
        tracing::debug!(url = reference, "no fallback for source map reference");
        return None;
    };
    match fetcher.fetch(&alt) {
        Ok(text) if !text.is_empty() => Some(text),
        Ok(_) => None,
        Err(e) => {
            tracing::debug!(url = %alt, "fallback source map fetch failed: {}", e);
            None
        }
    }
}

/// Maps found by [`resolve_all`].
#[derive(Debug, Clone, Default)]
pub struct ResolvedMaps {
    /// Bundle URL -> map text, in bundle order.
    pub maps: IndexMap<String, String>,
    /// Vendor bundles that had no map and were skipped with a warning.
    pub vendor_skipped: Vec<String>,
}

/// Resolves the map of every bundle. Bundles without a resolvable map are
/// left out of `maps`, so its keys are a subset of `bundles`' keys and keep
/// their order.
pub fn resolve_all(
    fetcher: &dyn TextFetcher,
    bundles: &IndexMap<String, String>,
    opts: &ResolveOptions,
) -> ResolvedMaps {
    let items: Vec<(&String, &String)> = bundles.iter().collect();
    let resolved = run_bounded(items, opts.max_concurrent, |(_, text)| {
        resolve_source_map(fetcher, text, &opts.fallback)
    });

    let mut out = ResolvedMaps::default();
    for ((url, _), map) in resolved {
        match map {
            Some(text) => {
                out.maps.insert(url.clone(), text);
            }
            None if opts.is_vendor(url) => {
                tracing::warn!(url = %url, "skipping vendor bundle without source map");
                eprintln!("Skipping vendor bundle without source map: {}", url);
                out.vendor_skipped.push(url.clone());
            }
            None => tracing::debug!(url = %url, "no source map"),
        }
    }
    out
}
