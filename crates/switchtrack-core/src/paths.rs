//! Standard paths used by switchtrack

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

const APP_DIR: &str = "switchtrack";

/// Standard switchtrack paths
pub struct Paths {
    /// Data directory (~/.local/share/switchtrack)
    pub data: PathBuf,
    /// Config directory (~/.config/switchtrack)
    pub config: PathBuf,
}

impl Default for Paths {
    fn default() -> Self {
        Self::new()
    }
}

impl Paths {
    pub fn new() -> Self {
        let data = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("~/.local/share"))
            .join(APP_DIR);

        let config = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join(APP_DIR);

        Self { data, config }
    }

    /// Build paths rooted at an explicit base directory
    pub fn rooted(base: impl Into<PathBuf>) -> Self {
        let base = base.into();
        Self {
            data: base.join("data"),
            config: base.join("config"),
        }
    }

    /// Location of the JSON config file
    pub fn config_file(&self) -> PathBuf {
        self.config.join("config.json")
    }

    /// Location of the tracing log file
    pub fn log_file(&self) -> PathBuf {
        self.data.join("switchtrack.log")
    }

    /// Create the data directory if it does not exist yet
    pub fn ensure_data_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.data)
            .with_context(|| format!("Failed to create data directory: {}", self.data.display()))
    }
}
