//! Logging init: append to a file under the XDG state dir, or stderr when that
//! file cannot be opened.

use anyhow::Result;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,unbundle=debug,unbundle_core=debug";
const LOG_FILE: &str = "unbundle.log";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

fn file_subscriber(file: fs::File) -> impl tracing::Subscriber + Send + Sync {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .finish()
}

fn log_file_path() -> Result<PathBuf> {
    let dirs = xdg::BaseDirectories::with_prefix("unbundle")?;
    let dir = dirs.get_state_home();
    fs::create_dir_all(&dir)?;
    Ok(dir.join(LOG_FILE))
}

/// Logs to `~/.local/state/unbundle/unbundle.log`. Returns Err when the file
/// cannot be opened or a subscriber is already installed; the caller then
/// uses [`init_logging_stderr`].
pub fn init_logging() -> Result<()> {
    let path = log_file_path()?;
    let file = fs::OpenOptions::new().create(true).append(true).open(&path)?;

    file_subscriber(file)
        .try_init()
        .map_err(|e| anyhow::anyhow!("install subscriber: {}", e))?;

    tracing::info!("unbundle logging initialized at {}", path.display());
    Ok(())
}

/// Logs to stderr only.
pub fn init_logging_stderr() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_subscriber_appends_events() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(LOG_FILE);
        let file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .unwrap();

        tracing::subscriber::with_default(file_subscriber(file), || {
            tracing::error!(url = "https://js.example.com/a.js", "bundle fetch failed");
        });

        let logged = fs::read_to_string(&path).unwrap();
        assert!(logged.contains("bundle fetch failed"));
        assert!(logged.contains("https://js.example.com/a.js"));
    }

    #[test]
    fn stderr_init_tolerates_existing_subscriber() {
        init_logging_stderr();
        init_logging_stderr();
    }
}
