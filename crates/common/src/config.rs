//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Endpoint the render service listens on by default.
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:5000/generate-video";

/// Global application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Render service connection settings.
    pub service: ServiceConfig,

    /// Session defaults applied to fresh global settings.
    pub defaults: CompositionDefaults,

    /// Directory where downloaded videos are written.
    pub download_dir: PathBuf,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Render service connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// URL the multipart submission is POSTed to.
    pub endpoint: String,

    /// Optional request timeout in seconds. `None` waits indefinitely.
    pub timeout_secs: Option<u64>,
}

/// Defaults for the per-session global settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompositionDefaults {
    /// Title text size in points.
    pub title_font_size: u32,

    /// Script text size in points.
    pub script_font_size: u32,

    /// Font identifier as sent on the wire.
    pub font: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "shorts=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            service: ServiceConfig::default(),
            defaults: CompositionDefaults::default(),
            download_dir: PathBuf::from("."),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_secs: None,
        }
    }
}

impl Default for CompositionDefaults {
    fn default() -> Self {
        Self {
            title_font_size: 200,
            script_font_size: 100,
            font: "NanumGothic".to_string(),
        }
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
    base.join("shorts-maker").join("config.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_client_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.service.endpoint, DEFAULT_ENDPOINT);
        assert!(config.service.timeout_secs.is_none());
        assert_eq!(config.defaults.title_font_size, 200);
        assert_eq!(config.defaults.script_font_size, 100);
        assert_eq!(config.defaults.font, "NanumGothic");
    }

    #[test]
    fn test_partial_config_fills_missing_sections() {
        let json = r#"{ "service": { "endpoint": "http://render.local/generate-video" } }"#;
        let config: AppConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.service.endpoint, "http://render.local/generate-video");
        assert!(config.service.timeout_secs.is_none());
        assert_eq!(config.defaults.script_font_size, 100);
        assert_eq!(config.logging.level, "info");
    }
}
