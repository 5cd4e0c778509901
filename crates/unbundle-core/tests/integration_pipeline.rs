//! Integration test: local HTTP server, real curl fetcher, full run on disk.
//!
//! The page lists three bundles: one whose map is only reachable through the
//! fallback URL, one with a map that is not JSON, and one without a map.

mod common;

use std::collections::HashMap;
use std::fs;

use common::static_server::{self, Route};
use tempfile::tempdir;
use unbundle_core::config::UnbundleConfig;
use unbundle_core::fetch::{CurlFetcher, FetchError, TextFetcher};
use unbundle_core::format::NoopFormatter;
use unbundle_core::pipeline;

fn start_site() -> String {
    let (listener, base) = static_server::bind();
    let html = format!(
        r#"<html><body>
<script src="{base}js/app.js"></script>
<script src="{base}js/broken.js"></script>
<script src="{base}js/plain.js"></script>
<script src="{base}js/app.js"></script>
</body></html>"#
    );
    let app = format!("app();\n//# sourceMappingURL={base}old/maps/app.js.map\n");
    let broken = format!("broken();\n//# sourceMappingURL={base}js/broken.js.map\n");
    let map = r#"{"version":3,"sourceRoot":"","sources":["webpack:///./src/index.ts","webpack:///./src/empty.ts","webpack:///../../outside.ts"],"sourcesContent":["export const a = 1;\n","","x"]}"#;

    let mut routes = HashMap::new();
    routes.insert("/charts".to_string(), Route::ok(html));
    routes.insert("/js/app.js".to_string(), Route::ok(app));
    routes.insert("/js/broken.js".to_string(), Route::ok(broken));
    routes.insert("/js/plain.js".to_string(), Route::ok("plain();"));
    routes.insert("/old/maps/app.js.map".to_string(), Route::status(500));
    routes.insert("/new/maps/app.js.map".to_string(), Route::ok(map));
    routes.insert("/js/broken.js.map".to_string(), Route::ok("<html>oops</html>"));
    static_server::serve(listener, routes);
    base
}

fn config_for(base: &str, dist: &std::path::Path) -> UnbundleConfig {
    UnbundleConfig {
        site_url: base.to_string(),
        page_path: "charts".to_string(),
        bundle_prefix: format!("{base}js/"),
        fallback_marker: "/old/".to_string(),
        fallback_base: format!("{base}new/"),
        dist_dir: dist.to_path_buf(),
        max_concurrent_fetches: 3,
        ..UnbundleConfig::default()
    }
}

#[test]
fn curl_fetcher_reports_status_and_body() {
    let base = start_site();
    let fetcher = CurlFetcher::default();
    assert_eq!(
        fetcher.fetch(&format!("{base}js/plain.js")).unwrap(),
        "plain();"
    );
    assert!(matches!(
        fetcher.fetch(&format!("{base}missing")),
        Err(FetchError::Status(404))
    ));
}

#[test]
fn full_run_reconstructs_sources() {
    let base = start_site();
    let out_dir = tempdir().unwrap();
    let dist = out_dir.path().join("dist");
    let cfg = config_for(&base, &dist);

    let report = pipeline::run(&cfg, &CurlFetcher::default(), &NoopFormatter, &mut std::io::sink())
        .expect("run");

    assert_eq!(report.bundles, 3);
    assert_eq!(report.mapped, 2);
    assert_eq!(report.failed_fetches, 0);
    assert_eq!(report.write.unmapped, 1);
    assert_eq!(report.write.degraded, 1);
    assert_eq!(report.write.sources_written, 2);

    // Exploded sources from the fallback map.
    assert_eq!(
        fs::read_to_string(dist.join("src").join("index.ts")).unwrap(),
        "export const a = 1;\n"
    );
    assert!(!dist.join("src").join("empty.ts").exists());
    assert_eq!(fs::read_to_string(dist.join("outside.ts")).unwrap(), "x");
    assert!(!out_dir.path().join("outside.ts").exists());

    // Map that is not JSON: bundle and map kept side by side.
    assert_eq!(
        fs::read_to_string(dist.join("broken.js.map")).unwrap(),
        "<html>oops</html>"
    );
    assert_eq!(
        fs::read_to_string(dist.join("broken.js")).unwrap(),
        "broken();\n//# sourceMappingURL=broken.js.map\n"
    );

    // No map at all.
    assert_eq!(
        fs::read_to_string(dist.join("not_mapped").join("plain.js")).unwrap(),
        "plain();"
    );
}

#[test]
fn inspect_summarizes_without_writing() {
    let base = start_site();
    let out_dir = tempdir().unwrap();
    let dist = out_dir.path().join("dist");
    let cfg = config_for(&base, &dist);

    let mut out = Vec::new();
    let previews = pipeline::inspect(&cfg, &CurlFetcher::default(), &mut out).unwrap();
    assert_eq!(previews.len(), 2);
    let printed = String::from_utf8(out).unwrap();
    assert!(printed.starts_with("2/3 bundles have source maps\n"));
    assert!(!dist.exists());
}
