//! wear.toml handling

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use wear_tiles::InflaterConfig;

const CONFIG_FILE: &str = "wear.toml";

/// Top-level CLI configuration (wear.toml)
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct WearConfig {
    #[serde(default)]
    pub log: LogConfig,
    /// Screen metrics and text estimation used by `wear tile`
    #[serde(default)]
    pub inflater: InflaterConfig,
}

/// Logging configuration
#[derive(Debug, Deserialize, Serialize)]
pub struct LogConfig {
    /// Default filter when neither `--verbose` nor `RUST_LOG` is given
    #[serde(default = "default_level")]
    pub level: String,
}

fn default_level() -> String {
    "warn".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

impl WearConfig {
    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, `wear.toml` in the current
    /// directory is used if present, otherwise the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let config_path = if path.is_dir() {
                    path.join(CONFIG_FILE)
                } else {
                    path.to_path_buf()
                };
                if !config_path.exists() {
                    anyhow::bail!("No config found at {}", config_path.display());
                }
                Self::load_file(&config_path)
            }
            None => {
                let local = Path::new(CONFIG_FILE);
                if local.exists() {
                    Self::load_file(local)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    fn load_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_file_uses_defaults() {
        let config = WearConfig::from_toml("").unwrap();
        assert_eq!(config.log.level, "warn");
        assert_eq!(config.inflater, InflaterConfig::default());
    }

    #[test]
    fn inflater_section_overrides_metrics() {
        let config = WearConfig::from_toml(
            r#"
            [log]
            level = "debug"

            [inflater]
            default_arc_thickness_dp = 6.0

            [inflater.metrics]
            density = 2.0
            width_px = 454
            height_px = 454
            "#,
        )
        .unwrap();
        assert_eq!(config.log.level, "debug");
        assert_eq!(config.inflater.default_arc_thickness_dp, 6.0);
        assert_eq!(config.inflater.metrics.density, 2.0);
        assert_eq!(config.inflater.metrics.width_px, 454);
    }

    #[test]
    fn round_trips_through_toml() {
        let config = WearConfig::default();
        let text = config.to_toml().unwrap();
        let back = WearConfig::from_toml(&text).unwrap();
        assert_eq!(back.inflater, config.inflater);
    }

    #[test]
    fn missing_explicit_path_is_an_error() {
        let err = WearConfig::load(Some(Path::new("/nonexistent/wear.toml"))).unwrap_err();
        assert!(err.to_string().contains("No config found"));
    }
}
