use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::audio::decode::DecodeMode;
use crate::report::OutputFormat;
use crate::tempo::TempoParams;

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub analysis: TempoParams,
    #[serde(default)]
    pub audio: AudioConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct AudioConfig {
    #[serde(default)]
    pub decode: DecodeMode,
    /// Overrides the decoded stream's rate (and the 44.1 kHz raw default).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_rate: Option<u32>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct FetchConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_prefix: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            allowed_prefix: None,
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_timeout_secs() -> u64 { crate::fetch::DEFAULT_TIMEOUT.as_secs() }
fn default_user_agent() -> String { crate::fetch::DEFAULT_USER_AGENT.into() }

impl Config {
    /// Reject analysis settings that cannot produce a tempo in range.
    pub fn validate(&self) -> Result<()> {
        let a = &self.analysis;
        ensure!(a.frame_size > 0, "analysis.frame_size must be greater than 0");
        ensure!(a.hop_size > 0, "analysis.hop_size must be greater than 0");
        ensure!(
            a.min_bpm <= a.max_bpm,
            "analysis.min_bpm ({}) exceeds analysis.max_bpm ({})",
            a.min_bpm,
            a.max_bpm
        );
        ensure!(
            (a.min_bpm..=a.max_bpm).contains(&a.fallback_bpm),
            "analysis.fallback_bpm ({}) must lie within {}..={}",
            a.fallback_bpm,
            a.min_bpm,
            a.max_bpm
        );
        Ok(())
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let config: Config =
        toml::from_str(&content).with_context(|| format!("Invalid config {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("Invalid config {}", path.display()))?;
    Ok(config)
}

/// Explicit path, else `beatsense.toml` in the working directory, else the
/// user config locations.
pub fn find_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    let local = PathBuf::from("beatsense.toml");
    if local.exists() {
        return Some(local);
    }
    if let Some(home) = dirs::home_dir() {
        let xdg = home.join(".config").join("beatsense").join("config.toml");
        if xdg.exists() {
            return Some(xdg);
        }
    }
    if let Some(config_dir) = dirs::config_dir() {
        let platform = config_dir.join("beatsense").join("config.toml");
        if platform.exists() {
            return Some(platform);
        }
    }
    None
}
