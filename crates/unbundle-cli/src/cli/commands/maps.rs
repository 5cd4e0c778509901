//! `unbundle maps` – source map summary without writing files.

use anyhow::{Context, Result};
use unbundle_core::config::UnbundleConfig;
use unbundle_core::fetch::CurlFetcher;
use unbundle_core::pipeline;

pub async fn run_maps(cfg: UnbundleConfig) -> Result<()> {
    tokio::task::spawn_blocking(move || {
        let fetcher = CurlFetcher::new(&cfg.http);
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        pipeline::inspect(&cfg, &fetcher, &mut out)
    })
    .await
    .context("maps task join")??;
    Ok(())
}
