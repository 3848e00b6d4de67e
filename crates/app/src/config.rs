//! Host configuration read from the environment

use std::path::{Path, PathBuf};

use glowdraw_config::DrawConfig;
use tracing::Level;

use crate::error::AppError;

pub const DEFAULT_WIDTH: u32 = 1280;
pub const DEFAULT_HEIGHT: u32 = 720;
pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// Host configuration
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Directory exports are written to
    pub output_dir: PathBuf,
    /// Maximum log level for the fmt subscriber
    pub log_level: Level,
    /// Render size in pixels
    pub width: u32,
    pub height: u32,
    /// Optional JSON file with engine tunables
    pub draw_config: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            log_level: Level::INFO,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            draw_config: None,
        }
    }
}

impl AppConfig {
    /// Parse from the GLOWDRAW_* environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Parse from any key lookup. Unset or unparsable values fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let dimension = |key: &str, fallback: u32| {
            lookup(key)
                .and_then(|v| v.trim().parse::<u32>().ok())
                .filter(|&v| v > 0)
                .unwrap_or(fallback)
        };

        Self {
            output_dir: lookup("GLOWDRAW_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
            log_level: lookup("GLOWDRAW_LOG")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.log_level),
            width: dimension("GLOWDRAW_WIDTH", defaults.width),
            height: dimension("GLOWDRAW_HEIGHT", defaults.height),
            draw_config: lookup("GLOWDRAW_CONFIG").map(PathBuf::from),
        }
    }

    /// Engine configuration, from the JSON file if one is set
    pub fn load_draw_config(&self) -> Result<DrawConfig, AppError> {
        match &self.draw_config {
            Some(path) => read_draw_config(path),
            None => Ok(DrawConfig::default()),
        }
    }
}

fn read_draw_config(path: &Path) -> Result<DrawConfig, AppError> {
    let text = std::fs::read_to_string(path).map_err(|source| AppError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| AppError::Config {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = AppConfig::from_lookup(lookup(&[]));
        assert_eq!(config, AppConfig::default());
        assert!(config.load_draw_config().is_ok());
    }

    #[test]
    fn test_reads_variables() {
        let config = AppConfig::from_lookup(lookup(&[
            ("GLOWDRAW_OUTPUT_DIR", "/tmp/exports"),
            ("GLOWDRAW_LOG", "debug"),
            ("GLOWDRAW_WIDTH", "640"),
            ("GLOWDRAW_HEIGHT", "480"),
        ]));
        assert_eq!(config.output_dir, PathBuf::from("/tmp/exports"));
        assert_eq!(config.log_level, Level::DEBUG);
        assert_eq!((config.width, config.height), (640, 480));
    }

    #[test]
    fn test_bad_values_fall_back() {
        let config = AppConfig::from_lookup(lookup(&[
            ("GLOWDRAW_LOG", "loud"),
            ("GLOWDRAW_WIDTH", "wide"),
            ("GLOWDRAW_HEIGHT", "0"),
        ]));
        assert_eq!(config.log_level, Level::INFO);
        assert_eq!(config.width, DEFAULT_WIDTH);
        assert_eq!(config.height, DEFAULT_HEIGHT);
    }

    #[test]
    fn test_missing_config_file() {
        let config = AppConfig {
            draw_config: Some(PathBuf::from("/nonexistent/glowdraw.json")),
            ..AppConfig::default()
        };
        assert!(matches!(
            config.load_draw_config(),
            Err(AppError::Io { .. })
        ));
    }
}
