use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::fetcher::FetchOptions;
use crate::image_request::ImageRequestOptions;

/// Default output directory for downloaded images.
pub const DEFAULT_OUTPUT_DIR: &str = "./disc";
/// Default worker count.
pub const DEFAULT_CONCURRENCY: usize = 10;

/// Retry policy parameters (optional `[retry]` section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts per request (including the first).
    pub max_attempts: u32,
    /// Base delay in seconds for exponential backoff (e.g. 0.25 = 250ms).
    pub base_delay_secs: f64,
    /// Maximum backoff delay in seconds.
    pub max_delay_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_secs: 0.25,
            max_delay_secs: 5,
        }
    }
}

/// Global configuration loaded from `~/.config/iiif-dl/config.toml`.
/// Missing keys take their default values.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IiifDlConfig {
    /// Directory images are written to when `-o` is not given.
    pub output_dir: PathBuf,
    /// Number of concurrent downloads.
    pub concurrency: usize,
    /// TCP/TLS connect timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Whole-request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Optional User-Agent; defaults to `iiif-dl/<version>`.
    #[serde(default)]
    pub user_agent: Option<String>,
    /// Optional retry policy; if missing, built-in defaults are used.
    #[serde(default)]
    pub retry: Option<RetryConfig>,
    /// Optional image request parameters used for templated URLs.
    #[serde(default)]
    pub image: Option<ImageRequestOptions>,
}

impl Default for IiifDlConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            concurrency: DEFAULT_CONCURRENCY,
            connect_timeout_secs: 15,
            request_timeout_secs: 30,
            user_agent: None,
            retry: None,
            image: None,
        }
    }
}

impl IiifDlConfig {
    /// Worker count, never below 1.
    pub fn effective_concurrency(&self) -> usize {
        self.concurrency.max(1)
    }

    pub fn fetch_options(&self) -> FetchOptions {
        let mut opts = FetchOptions {
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            timeout: Duration::from_secs(self.request_timeout_secs),
            ..FetchOptions::default()
        };
        if let Some(ua) = self.user_agent.as_deref().filter(|s| !s.trim().is_empty()) {
            opts.user_agent = ua.to_string();
        }
        opts
    }

    pub fn retry_config(&self) -> RetryConfig {
        self.retry.clone().unwrap_or_default()
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("iiif-dl")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<IiifDlConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = IiifDlConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: IiifDlConfig = toml::from_str(&data)?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = IiifDlConfig::default();
        assert_eq!(cfg.output_dir, PathBuf::from("./disc"));
        assert_eq!(cfg.concurrency, 10);
        assert_eq!(cfg.request_timeout_secs, 30);
        assert!(cfg.retry.is_none());
        assert!(cfg.image.is_none());
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = IiifDlConfig::default();
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: IiifDlConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.output_dir, cfg.output_dir);
        assert_eq!(parsed.concurrency, cfg.concurrency);
        assert_eq!(parsed.connect_timeout_secs, cfg.connect_timeout_secs);
    }

    #[test]
    fn config_toml_custom_values() {
        let toml = r#"
            output_dir = "/srv/scans"
            concurrency = 0
            connect_timeout_secs = 5
            request_timeout_secs = 60
            user_agent = "scanbot/1.0"

            [retry]
            max_attempts = 1
            base_delay_secs = 0.5
            max_delay_secs = 2

            [image]
            size = "max"
        "#;
        let cfg: IiifDlConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.output_dir, PathBuf::from("/srv/scans"));
        assert_eq!(cfg.effective_concurrency(), 1);
        let fetch = cfg.fetch_options();
        assert_eq!(fetch.connect_timeout, Duration::from_secs(5));
        assert_eq!(fetch.timeout, Duration::from_secs(60));
        assert_eq!(fetch.user_agent, "scanbot/1.0");
        assert_eq!(cfg.retry_config().max_attempts, 1);
        let image = cfg.image.unwrap();
        assert_eq!(image.size.as_deref(), Some("max"));
        assert!(image.format.is_none());
    }

    #[test]
    fn partial_file_fills_defaults() {
        let cfg: IiifDlConfig = toml::from_str("concurrency = 4").unwrap();
        assert_eq!(cfg.concurrency, 4);
        assert_eq!(cfg.output_dir, PathBuf::from("./disc"));
        assert_eq!(cfg.request_timeout_secs, 30);
    }

    #[test]
    fn blank_user_agent_keeps_default() {
        let cfg = IiifDlConfig {
            user_agent: Some("  ".to_string()),
            ..IiifDlConfig::default()
        };
        assert!(cfg.fetch_options().user_agent.starts_with("iiif-dl/"));
    }
}
