//! Configuration file management
//!
//! Loads TOML configuration files and provides application settings.
//! Default config path: ~/.config/ocon/config.toml

use log::{info, warn};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Application settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Scrollback settings
    pub scrollback: ScrollbackConfig,
    /// Prompt settings
    pub prompt: PromptConfig,
    /// Font cell metrics
    pub font: FontConfig,
    /// Runtime settings
    pub runtime: RuntimeConfig,
}

/// Scrollback settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScrollbackConfig {
    /// Display-line cap for the log
    pub max_lines: usize,
}

impl Default for ScrollbackConfig {
    fn default() -> Self {
        Self { max_lines: crate::console::scrollback::DEFAULT_MAX_LINES }
    }
}

/// Prompt settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PromptConfig {
    /// Prefix drawn before the input line
    pub text: String,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self { text: "> ".to_string() }
    }
}

/// Font cell metrics
///
/// The console is strictly monospaced; these pixel sizes define the
/// character grid everything else (wrapping, selection, layout) snaps to.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    /// Glyph advance in pixels
    pub char_width_px: i32,
    /// Glyph height in pixels
    pub line_height_px: i32,
    /// Extra pixels between display lines
    pub vertical_spacing_px: i32,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self { char_width_px: 8, line_height_px: 16, vertical_spacing_px: 0 }
    }
}

impl FontConfig {
    /// Vertical distance between consecutive display lines.
    pub fn line_advance_px(&self) -> i32 {
        self.line_height_px + self.vertical_spacing_px
    }
}

/// Runtime settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Owner-loop wait timeout in milliseconds
    pub poll_interval_ms: u64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self { poll_interval_ms: 50 }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scrollback: ScrollbackConfig::default(),
            prompt: PromptConfig::default(),
            font: FontConfig::default(),
            runtime: RuntimeConfig::default(),
        }
    }
}

/// Config file errors, kept typed so callers can tell a missing file
/// from a malformed one.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

impl Config {
    /// System-wide config path
    const SYSTEM_CONFIG_PATH: &'static str = "/etc/ocon/config.toml";

    /// Get the path that would be used for loading config.
    /// Returns None if using built-in defaults.
    pub fn config_path() -> Option<PathBuf> {
        // 1. OCON_CONFIG environment variable
        if let Ok(path) = std::env::var("OCON_CONFIG") {
            let p = Path::new(&path);
            if p.exists() {
                return Some(p.to_path_buf());
            }
        }

        // 2. User config: ~/.config/ocon/config.toml
        if let Some(config_dir) = dirs::config_dir() {
            let config_path = config_dir.join("ocon").join("config.toml");
            if config_path.exists() {
                return Some(config_path);
            }
        }

        // 3. System config: /etc/ocon/config.toml
        let system_config = Path::new(Self::SYSTEM_CONFIG_PATH);
        if system_config.exists() {
            return Some(system_config.to_path_buf());
        }

        None
    }

    /// Load configuration with priority:
    /// 1. OCON_CONFIG environment variable
    /// 2. ~/.config/ocon/config.toml (user config)
    /// 3. /etc/ocon/config.toml (system config)
    /// 4. Built-in defaults
    pub fn load() -> Self {
        if let Some(path) = Self::config_path() {
            match Self::load_from_file(&path) {
                Ok(config) => {
                    info!("Loaded config: {}", path.display());
                    return config;
                }
                Err(e) => {
                    warn!("Failed to load config {}: {}", path.display(), e);
                }
            }
        }
        info!("Using built-in default config");
        Self::default()
    }

    /// Load settings from specified path
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let c = Config::default();
        assert_eq!(c.scrollback.max_lines, 1024);
        assert_eq!(c.prompt.text, "> ");
        assert_eq!(c.font.line_advance_px(), 16);
        assert_eq!(c.runtime.poll_interval_ms, 50);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let c: Config = toml::from_str(
            r#"
            [scrollback]
            max_lines = 200

            [font]
            vertical_spacing_px = 2
            "#,
        )
        .unwrap();
        assert_eq!(c.scrollback.max_lines, 200);
        assert_eq!(c.prompt.text, "> ");
        assert_eq!(c.font.char_width_px, 8);
        assert_eq!(c.font.line_advance_px(), 18);
    }

    #[test]
    fn test_missing_file_is_an_io_error() {
        let err = Config::load_from_file(Path::new("/nonexistent/ocon.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_malformed_value_fails_to_parse() {
        assert!(toml::from_str::<Config>("[scrollback]\nmax_lines = \"many\"").is_err());
    }
}
