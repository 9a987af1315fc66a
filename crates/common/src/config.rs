//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Global application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Default rendering settings.
    pub render: RenderDefaults,

    /// Optional typeface for the pressed-key banner. When unset, common
    /// system font locations are searched at startup.
    pub font: Option<PathBuf>,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Default rendering parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderDefaults {
    /// Output frame rate. The action log is synchronized against this
    /// fixed rate, independent of the source container's metadata.
    pub fps: u32,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "demoscope=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            render: RenderDefaults::default(),
            font: None,
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for RenderDefaults {
    fn default() -> Self {
        Self { fps: 30 }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if config_path.exists() {
            match std::fs::read_to_string(&config_path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {:?}: {}", config_path, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Save config to the standard location.
    pub fn save(&self) -> Result<(), std::io::Error> {
        let config_path = config_file_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(config_path, json)
    }
}

/// Standard config file location.
fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("demoscope").join("config.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_fps_is_thirty() {
        let config = AppConfig::default();
        assert_eq!(config.render.fps, 30);
        assert!(config.font.is_none());
    }

    #[test]
    fn test_config_json_roundtrip() {
        let config = AppConfig {
            render: RenderDefaults { fps: 60 },
            font: Some(PathBuf::from("/tmp/font.ttf")),
            logging: LoggingConfig {
                level: "debug".to_string(),
                json: true,
                file: None,
            },
        };
        let json = serde_json::to_string(&config).unwrap();
        let parsed: AppConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.render.fps, 60);
        assert_eq!(parsed.font, Some(PathBuf::from("/tmp/font.ttf")));
        assert_eq!(parsed.logging.level, "debug");
    }

    #[test]
    fn test_save_then_load_roundtrip() {
        let dir =
            std::env::temp_dir().join(format!("demoscope-config-test-{}", std::process::id()));
        std::env::set_var("XDG_CONFIG_HOME", &dir);

        let config = AppConfig {
            render: RenderDefaults { fps: 24 },
            font: Some(PathBuf::from("/tmp/banner.ttf")),
            logging: LoggingConfig::default(),
        };
        config.save().unwrap();

        let loaded = AppConfig::load();
        assert_eq!(loaded.render.fps, 24);
        assert_eq!(loaded.font, Some(PathBuf::from("/tmp/banner.ttf")));

        std::env::remove_var("XDG_CONFIG_HOME");
        std::fs::remove_dir_all(&dir).ok();
    }
}
