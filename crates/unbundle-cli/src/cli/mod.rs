//! CLI for unbundle.

mod commands;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;
use unbundle_core::config::{self, UnbundleConfig};

use commands::{run_completions, run_maps, run_pipeline};

/// Top-level CLI for unbundle.
#[derive(Debug, Parser)]
#[command(name = "unbundle")]
#[command(
    about = "unbundle: download JS bundles, resolve their source maps and rebuild the original sources",
    long_about = None
)]
pub struct Cli {
    /// Defaults to `run` with configured settings.
    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Download bundles and maps, write reconstructed sources, then format them.
    Run(RunArgs),

    /// Print how many bundles have source maps and a preview of each map.
    Maps(SourceArgs),

    /// Print shell completions.
    Completions {
        /// Target shell.
        shell: Shell,
    },
}

/// Where to look for bundles.
#[derive(Debug, Clone, Default, Args)]
pub struct SourceArgs {
    /// Page path on the configured site (e.g. `charts`).
    #[arg(long, value_name = "PATH")]
    pub page: Option<String>,
    /// Fetch up to N URLs concurrently (1 = sequential).
    #[arg(long, value_name = "N")]
    pub jobs: Option<usize>,
}

#[derive(Debug, Clone, Default, Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    /// Output root.
    #[arg(long, value_name = "DIR")]
    pub dist: Option<PathBuf>,
    /// Skip the external formatter.
    #[arg(long)]
    pub no_format: bool,
}

impl SourceArgs {
    fn apply(&self, cfg: &mut UnbundleConfig) {
        if let Some(page) = &self.page {
            cfg.page_path = page.clone();
        }
        if let Some(jobs) = self.jobs {
            cfg.max_concurrent_fetches = jobs.max(1);
        }
    }
}

impl RunArgs {
    fn apply(&self, cfg: &mut UnbundleConfig) {
        self.source.apply(cfg);
        if let Some(dist) = &self.dist {
            cfg.dist_dir = dist.clone();
        }
        if self.no_format {
            cfg.formatter.enabled = false;
        }
    }
}

impl Cli {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        match cli.command.unwrap_or_else(|| CliCommand::Run(RunArgs::default())) {
            CliCommand::Run(args) => {
                let mut cfg = config::load_or_init()?;
                args.apply(&mut cfg);
                tracing::debug!("effective config: {:?}", cfg);
                run_pipeline(cfg).await?;
            }
            CliCommand::Maps(args) => {
                let mut cfg = config::load_or_init()?;
                args.apply(&mut cfg);
                tracing::debug!("effective config: {:?}", cfg);
                run_maps(cfg).await?;
            }
            CliCommand::Completions { shell } => run_completions(shell),
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
