use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Runtime configuration, merged from an optional TOML file and
/// environment variables. Environment wins.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP base address of the document node.
    pub node_address: String,
    /// Directory holding per-client state (the identity file). Defaults
    /// to the platform data directory.
    pub data_dir: Option<PathBuf>,
    /// Milliseconds between background sync passes.
    pub sync_interval_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            node_address: "http://localhost:2020/".into(),
            data_dir: None,
            sync_interval_ms: 1000,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let mut config = match Self::config_file_path() {
            Some(path) if path.exists() => {
                let text = fs::read_to_string(&path)
                    .with_context(|| format!("reading {}", path.display()))?;
                toml::from_str(&text).with_context(|| format!("parsing {}", path.display()))?
            }
            _ => Self::default(),
        };

        if let Ok(node) = std::env::var("SPRITEBOARD_NODE") {
            config.node_address = node;
        }
        if let Ok(interval) = std::env::var("SPRITEBOARD_SYNC_INTERVAL_MS") {
            config.sync_interval_ms = interval
                .parse()
                .context("SPRITEBOARD_SYNC_INTERVAL_MS must be an integer")?;
        }

        Ok(config)
    }

    fn config_file_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("spriteboard").join("config.toml"))
    }

    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }
        dirs::data_dir()
            .map(|dir| dir.join("spriteboard"))
            .context("no data directory available on this platform")
    }
}
