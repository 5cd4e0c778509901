//! External formatter run over the output root after writing.

use anyhow::{Context, Result};
use std::path::Path;
use std::process::{Command, Stdio};

use crate::config::FormatterConfig;

/// Placeholder in formatter args replaced by the output directory.
pub const DIR_PLACEHOLDER: &str = "{dir}";

/// Capability to format every file under a directory in place.
pub trait DirectoryFormatter {
    fn format_directory(&self, dir: &Path) -> Result<()>;
}

/// Runs an external program (biome by default) with inherited stdio.
#[derive(Debug, Clone)]
pub struct CommandFormatter {
    program: String,
    args: Vec<String>,
}

impl CommandFormatter {
    pub fn new(cfg: &FormatterConfig) -> Self {
        Self {
            program: cfg.program.clone(),
            args: cfg.args.clone(),
        }
    }

    /// Arguments with `{dir}` substituted; `dir` is appended if no arg mentions it.
    pub fn args_for(&self, dir: &Path) -> Vec<String> {
        let dir = dir.to_string_lossy();
        let mut args: Vec<String> = self
            .args
            .iter()
            .map(|a| a.replace(DIR_PLACEHOLDER, &dir))
            .collect();
        if !self.args.iter().any(|a| a.contains(DIR_PLACEHOLDER)) {
            args.push(dir.into_owned());
        }
        args
    }
}

impl DirectoryFormatter for CommandFormatter {
    fn format_directory(&self, dir: &Path) -> Result<()> {
        let args = self.args_for(dir);
        tracing::debug!(program = %self.program, ?args, "running formatter");
        let status = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .with_context(|| format!("spawn formatter {}", self.program))?;
        if !status.success() {
            anyhow::bail!("formatter {} exited with {}", self.program, status);
        }
        Ok(())
    }
}

/// Formatter used when formatting is disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopFormatter;

impl DirectoryFormatter for NoopFormatter {
    fn format_directory(&self, _dir: &Path) -> Result<()> {
        Ok(())
    }
}

/// Formatter selected by config.
pub fn from_config(cfg: &FormatterConfig) -> Box<dyn DirectoryFormatter> {
    if cfg.enabled {
        Box::new(CommandFormatter::new(cfg))
    } else {
        Box::new(NoopFormatter)
    }
}
