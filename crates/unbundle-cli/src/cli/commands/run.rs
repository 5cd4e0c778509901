//! `unbundle run` – full download / reconstruct / format run.

use anyhow::{Context, Result};
use unbundle_core::config::UnbundleConfig;
use unbundle_core::fetch::CurlFetcher;
use unbundle_core::{format, pipeline};

pub async fn run_pipeline(cfg: UnbundleConfig) -> Result<()> {
    let report = tokio::task::spawn_blocking(move || {
        let fetcher = CurlFetcher::new(&cfg.http);
        let formatter = format::from_config(&cfg.formatter);
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        pipeline::run(&cfg, &fetcher, formatter.as_ref(), &mut out)
    })
    .await
    .context("run task join")??;

    println!(
        "Done: {}/{} bundles mapped, {} sources written ({} collisions), {} unmapped, {} with unreadable maps.",
        report.mapped,
        report.bundles,
        report.write.sources_written,
        report.write.collisions,
        report.write.unmapped,
        report.write.degraded
    );
    if report.failed_fetches > 0 {
        println!("{} bundle(s) could not be fetched.", report.failed_fetches);
    }
    tracing::info!("run completed");
    Ok(())
}
