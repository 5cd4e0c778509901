use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// HTTP client parameters (optional `[http]` section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Connect timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Whole-request timeout in seconds. A hung fetch counts as a failed fetch.
    pub timeout_secs: u64,
    /// Optional User-Agent header; libcurl sends none when unset.
    pub user_agent: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 15,
            timeout_secs: 60,
            user_agent: None,
        }
    }
}

impl HttpConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// External formatter run against the output root once writing is done.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatterConfig {
    pub enabled: bool,
    pub program: String,
    /// Arguments; `{dir}` is replaced by the output root (appended if missing).
    pub args: Vec<String>,
}

impl Default for FormatterConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            program: "biome".to_string(),
            args: [
                "format",
                "{dir}",
                "--write",
                "--format-with-errors",
                "true",
                "--files-ignore-unknown",
                "true",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

/// Global configuration loaded from `~/.config/unbundle/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UnbundleConfig {
    /// Site whose HTML page lists the bundles.
    pub site_url: String,
    /// Page path appended to `site_url` for bundle discovery.
    pub page_path: String,
    /// Absolute URL prefix of bundle scripts referenced by the page.
    pub bundle_prefix: String,
    /// Substring of a map reference after which the fallback path starts.
    pub fallback_marker: String,
    /// Base URL the fallback path is appended to.
    pub fallback_base: String,
    /// URL substrings of third-party bundles that are expected to ship without maps.
    pub vendor_markers: Vec<String>,
    /// Output root.
    pub dist_dir: PathBuf,
    /// Maximum fetches in flight at once (1 = sequential).
    pub max_concurrent_fetches: usize,
    pub http: HttpConfig,
    pub formatter: FormatterConfig,
}

impl Default for UnbundleConfig {
    fn default() -> Self {
        Self {
            site_url: "https://roblox.com/".to_string(),
            page_path: "charts".to_string(),
            bundle_prefix: "https://js.rbxcdn.com/".to_string(),
            fallback_marker: "rbxcdn.com/".to_string(),
            fallback_base: "https://js.rbxcdn.com/".to_string(),
            vendor_markers: vec!["sentry".to_string()],
            dist_dir: PathBuf::from("dist"),
            max_concurrent_fetches: 8,
            http: HttpConfig::default(),
            formatter: FormatterConfig::default(),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("unbundle")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<UnbundleConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = UnbundleConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: UnbundleConfig = toml::from_str(&data)?;
    Ok(cfg)
}
