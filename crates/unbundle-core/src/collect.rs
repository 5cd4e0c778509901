//! Bundle discovery: find bundle script URLs in the site's HTML page and
//! download them.

use anyhow::{Context, Result};
use indexmap::IndexMap;
use std::collections::HashSet;

use crate::config::UnbundleConfig;
use crate::fetch::{fetch_all, TextFetcher};

const BUNDLE_SUFFIX: &str = ".js";

/// Bundles fetched in one run.
#[derive(Debug, Clone, Default)]
pub struct CollectedBundles {
    /// Bundle URL -> bundle text, in the order the page references them.
    pub bundles: IndexMap<String, String>,
    /// Bundle URLs whose fetch failed (skipped).
    pub failed: Vec<String>,
}

/// `site_url` and `page_path` joined by exactly one `/`.
pub fn page_url(site_url: &str, page_path: &str) -> String {
    format!(
        "{}/{}",
        site_url.trim_end_matches('/'),
        page_path.trim_start_matches('/')
    )
}

fn ends_candidate(c: char) -> bool {
    c.is_whitespace() || matches!(c, '"' | '\'' | '`' | '<' | '>' | '(' | ')')
}

/// Bundle URLs referenced by `html`: every occurrence of `bundle_prefix`,
/// extended up to the next quote, whitespace, angle bracket or parenthesis,
/// and cut after the last `.js` in that span (so `a.js?v=1` yields `a.js`).
/// Spans without a `.js` are ignored. Duplicates are dropped; first-seen
/// order is kept.
pub fn discover_bundle_urls(html: &str, bundle_prefix: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut urls = Vec::new();
    if bundle_prefix.is_empty() {
        return urls;
    }

    let mut from = 0;
    while let Some(pos) = html[from..].find(bundle_prefix) {
        let start = from + pos;
        let rest = &html[start + bundle_prefix.len()..];
        let span = &rest[..rest.find(ends_candidate).unwrap_or(rest.len())];
        if let Some(idx) = span.rfind(BUNDLE_SUFFIX).filter(|i| *i > 0) {
            let end = start + bundle_prefix.len() + idx + BUNDLE_SUFFIX.len();
            let candidate = &html[start..end];
            if seen.insert(candidate) {
                urls.push(candidate.to_string());
            }
        }
        from = start + bundle_prefix.len();
    }
    urls
}

/// Fetches the page, discovers its bundles and downloads them.
///
/// A failed page fetch is fatal. A failed bundle fetch is logged and skipped.
pub fn collect_bundles(fetcher: &dyn TextFetcher, cfg: &UnbundleConfig) -> Result<CollectedBundles> {
    let page = page_url(&cfg.site_url, &cfg.page_path);
    let html = fetcher
        .fetch(&page)
        .with_context(|| format!("fetch page {}", page))?;

    let urls = discover_bundle_urls(&html, &cfg.bundle_prefix);
    tracing::info!(page = %page, count = urls.len(), "discovered bundles");

    let mut collected = CollectedBundles::default();
    for (url, result) in fetch_all(fetcher, urls, cfg.max_concurrent_fetches) {
        match result {
            Ok(text) => {
                collected.bundles.insert(url, text);
            }
            Err(e) => {
                tracing::warn!(url = %url, "bundle fetch failed, skipping: {}", e);
                eprintln!("warning: could not fetch {}: {}", url, e);
                collected.failed.push(url);
            }
        }
    }
    Ok(collected)
}
