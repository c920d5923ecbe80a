//! Configuration management for switchtrack

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// How a counted context switch is signalled to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CueKind {
    /// Terminal bell
    #[default]
    Bell,
    /// Desktop notification via the platform notifier
    Desktop,
    /// No cue at all
    None,
}

impl CueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CueKind::Bell => "bell",
            CueKind::Desktop => "desktop",
            CueKind::None => "none",
        }
    }
}

impl fmt::Display for CueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CueKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bell" => Ok(CueKind::Bell),
            "desktop" => Ok(CueKind::Desktop),
            "none" | "off" => Ok(CueKind::None),
            other => Err(format!("unknown cue '{}' (expected bell, desktop or none)", other)),
        }
    }
}

/// switchtrack configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Timer cadence while a session is active (milliseconds)
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Cue fired on every counted switch
    #[serde(default)]
    pub cue: CueKind,

    /// Number of past sessions listed in the dashboard
    #[serde(default = "default_history_display")]
    pub history_display: usize,
}

fn default_tick_interval_ms() -> u64 {
    100
}

fn default_history_display() -> usize {
    10
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            cue: CueKind::default(),
            history_display: default_history_display(),
        }
    }
}

impl Config {
    /// Load config from file, falling back to defaults when it is absent
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;
        Ok(config)
    }

    /// Save config to file
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
        }
        let content = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_uses_defaults() {
        let temp = tempfile::tempdir().unwrap();
        let config = Config::load(&temp.path().join("absent.json")).unwrap();
        assert_eq!(config.tick_interval_ms, 100);
        assert_eq!(config.cue, CueKind::Bell);
        assert_eq!(config.history_display, 10);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("config.json");
        std::fs::write(&path, r#"{"cue": "desktop"}"#).unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.cue, CueKind::Desktop);
        assert_eq!(config.tick_interval_ms, 100);
    }

    #[test]
    fn test_save_then_load() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("nested").join("config.json");

        let config = Config {
            tick_interval_ms: 250,
            cue: CueKind::None,
            history_display: 3,
        };
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.tick_interval_ms, 250);
        assert_eq!(loaded.cue, CueKind::None);
        assert_eq!(loaded.history_display, 3);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("config.json");
        std::fs::write(&path, "{not json").unwrap();

        assert!(Config::load(&path).is_err());
    }

    #[test]
    fn test_cue_from_str() {
        assert_eq!("bell".parse::<CueKind>().unwrap(), CueKind::Bell);
        assert_eq!("Desktop".parse::<CueKind>().unwrap(), CueKind::Desktop);
        assert_eq!("off".parse::<CueKind>().unwrap(), CueKind::None);
        assert!("chime".parse::<CueKind>().is_err());
    }
}
