//! Application configuration management.
//!
//! Loads and saves application-wide settings: the preferred TUI theme,
//! the default camera device, an optional scanner helper override, and
//! the configured share targets. Stored as `config.json` under the
//! platform config directory; a missing or unreadable file silently
//! falls back to defaults.

use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::cli::ThemeArg;
use crate::providers::share::ShareTargetConfig;

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Preferred TUI theme.
    #[serde(default)]
    pub theme: ThemeArg,

    /// Camera device node handed to the permission probe and the helper.
    #[serde(default)]
    pub device: Option<String>,

    /// Scanner helper invocation overriding the built-in default.
    #[serde(default)]
    pub scanner: Option<String>,

    /// Share targets offered by the share picker, in order. The system
    /// clipboard is always prepended at runtime.
    #[serde(default)]
    pub share_targets: Vec<ShareTargetConfig>,
}

impl Config {
    /// Load the configuration from the default platform-specific path.
    #[must_use]
    pub fn load() -> Self {
        match Self::load_internal() {
            Ok(config) => config,
            Err(e) => {
                log::debug!("Failed to load config, using defaults: {}", e);
                Self::default()
            }
        }
    }

    fn load_internal() -> Result<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save the configuration to the default platform-specific path.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Get the default platform-specific configuration path.
    fn config_path() -> Result<PathBuf> {
        let project_dirs = ProjectDirs::from("io", "qrlink", "qrlink")
            .ok_or_else(|| anyhow::anyhow!("Failed to determine project directories"))?;
        Ok(project_dirs.config_dir().join("config.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.theme, ThemeArg::Auto);
        assert!(config.device.is_none());
        assert!(config.scanner.is_none());
        assert!(config.share_targets.is_empty());
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config {
            theme: ThemeArg::Light,
            device: Some("/dev/video2".to_string()),
            scanner: Some("zbarcam --raw".to_string()),
            share_targets: vec![ShareTargetConfig {
                label: Some("notes".to_string()),
                command: "tee".to_string(),
                args: vec!["-a".to_string(), "links.txt".to_string()],
            }],
        };

        let json = serde_json::to_string(&config).unwrap();
        let back: Config = serde_json::from_str(&json).unwrap();

        assert_eq!(back.theme, ThemeArg::Light);
        assert_eq!(back.device.as_deref(), Some("/dev/video2"));
        assert_eq!(back.scanner.as_deref(), Some("zbarcam --raw"));
        assert_eq!(back.share_targets.len(), 1);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let back: Config = serde_json::from_str(r#"{"device": "/dev/video1"}"#).unwrap();
        assert_eq!(back.device.as_deref(), Some("/dev/video1"));
        assert_eq!(back.theme, ThemeArg::Auto);
        assert!(back.share_targets.is_empty());
    }
}
