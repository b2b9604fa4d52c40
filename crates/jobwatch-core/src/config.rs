use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::fetch::Timeouts;
use crate::poll::PollConfig;

/// Polling parameters (optional `[poll]` section in config.toml, also used
/// for CLI overrides). Unset fields fall back to `PollConfig::default()`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PollSettings {
    /// First wait after a non-terminal snapshot, in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_interval_ms: Option<u64>,
    /// Backoff ceiling in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_interval_ms: Option<u64>,
    /// Interval growth factor per non-terminal poll (>= 1.0).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backoff_multiplier: Option<f64>,
    /// Interval budget before giving up, in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
    /// Consecutive fetch failures tolerated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_retries: Option<u32>,
}

impl PollSettings {
    /// Fields set in `overrides` win over ours.
    pub fn merged(&self, overrides: &PollSettings) -> PollSettings {
        PollSettings {
            initial_interval_ms: overrides.initial_interval_ms.or(self.initial_interval_ms),
            max_interval_ms: overrides.max_interval_ms.or(self.max_interval_ms),
            backoff_multiplier: overrides.backoff_multiplier.or(self.backoff_multiplier),
            timeout_ms: overrides.timeout_ms.or(self.timeout_ms),
            max_retries: overrides.max_retries.or(self.max_retries),
        }
    }

    /// Resolve defaults and validate.
    pub fn to_poll_config(&self) -> Result<PollConfig> {
        let d = PollConfig::default();
        let cfg = PollConfig {
            initial_interval: self
                .initial_interval_ms
                .map(Duration::from_millis)
                .unwrap_or(d.initial_interval),
            max_interval: self
                .max_interval_ms
                .map(Duration::from_millis)
                .unwrap_or(d.max_interval),
            backoff_multiplier: self.backoff_multiplier.unwrap_or(d.backoff_multiplier),
            timeout: self.timeout_ms.map(Duration::from_millis).unwrap_or(d.timeout),
            max_retries: self.max_retries.unwrap_or(d.max_retries),
        };
        if cfg.initial_interval.is_zero() {
            bail!("initial_interval_ms must be greater than 0");
        }
        if cfg.max_interval < cfg.initial_interval {
            bail!(
                "max_interval_ms ({}) is below initial_interval_ms ({})",
                cfg.max_interval.as_millis(),
                cfg.initial_interval.as_millis()
            );
        }
        if !cfg.backoff_multiplier.is_finite() || cfg.backoff_multiplier < 1.0 {
            bail!(
                "backoff_multiplier must be a finite number >= 1.0, got {}",
                cfg.backoff_multiplier
            );
        }
        if cfg.max_retries == 0 {
            bail!("max_retries must be at least 1");
        }
        Ok(cfg)
    }
}

/// Global configuration loaded from `~/.config/jobwatch/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobwatchConfig {
    /// Base URL of the finance server API (job and operation endpoints hang off it).
    pub base_url: String,
    /// TCP connect timeout per request, in seconds.
    pub connect_timeout_secs: u64,
    /// Whole-request timeout per request, in seconds.
    pub request_timeout_secs: u64,
    /// Optional polling parameters; if missing, built-in defaults are used.
    #[serde(default)]
    pub poll: Option<PollSettings>,
}

impl Default for JobwatchConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000/api/".to_string(),
            connect_timeout_secs: 10,
            request_timeout_secs: 30,
            poll: None,
        }
    }
}

impl JobwatchConfig {
    pub fn timeouts(&self) -> Timeouts {
        Timeouts {
            connect: Duration::from_secs(self.connect_timeout_secs),
            request: Duration::from_secs(self.request_timeout_secs),
        }
    }

    /// Poll config from the `[poll]` section with `overrides` applied on top.
    pub fn poll_config(&self, overrides: &PollSettings) -> Result<PollConfig> {
        self.poll
            .clone()
            .unwrap_or_default()
            .merged(overrides)
            .to_poll_config()
            .context("invalid poll settings")
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("jobwatch")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<JobwatchConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = JobwatchConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from_path(&path)
}

pub fn load_from_path(path: &Path) -> Result<JobwatchConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("read config {}", path.display()))?;
    let cfg: JobwatchConfig =
        toml::from_str(&data).with_context(|| format!("parse config {}", path.display()))?;
    Ok(cfg)
}
