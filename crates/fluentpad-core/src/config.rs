//! Editor configuration.
//!
//! Every section is `#[serde(default)]`, so a config file only needs the
//! keys it wants to change and older files keep loading.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main editor configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Editing behavior
    pub editor: EditorConfig,

    /// Line metrics, gutter and zoom
    pub view: ViewConfig,

    /// Defaults for find next / find previous
    pub search: SearchConfig,
}

impl Config {
    /// Loads config from the default location, falling back to defaults.
    pub fn load() -> Self {
        match Self::load_from_default_path() {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!("Ignoring config file: {}", err);
                Self::default()
            }
        }
    }

    /// Loads config from a file.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    fn load_from_default_path() -> Result<Self, ConfigError> {
        let path = Self::default_path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Returns the default config file path.
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("fluentpad").join("config.toml"))
    }

    /// Writes the config as TOML.
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

/// Editing behavior configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Undo history limit; unset keeps every record
    pub undo_limit: Option<usize>,

    /// Merge typing bursts into one undo step
    pub coalesce_typing: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            undo_limit: None,
            coalesce_typing: true,
        }
    }
}

/// Presentation metrics at 100% zoom.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Font family
    pub font_family: String,

    /// Font size in points
    pub font_size: f32,

    /// Line height multiplier
    pub line_height: f32,

    /// Fixed gutter padding in pixels
    pub gutter_padding: f32,

    /// Width of one digit in the gutter font, in pixels
    pub digit_advance: f32,

    /// Lines that fit in the viewport
    pub visible_lines: usize,

    /// Zoom in/out step, in percent
    pub zoom_step: u32,

    /// Smallest zoom, in percent
    pub min_zoom: u32,

    /// Largest zoom, in percent
    pub max_zoom: u32,

    /// Show line numbers
    pub line_numbers: bool,

    /// Highlight current line
    pub highlight_current_line: bool,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            font_family: "Consolas".to_string(),
            font_size: 11.0,
            line_height: 1.4,
            gutter_padding: 24.0,
            digit_advance: 8.0,
            visible_lines: 40,
            zoom_step: 10,
            min_zoom: 10,
            max_zoom: 500,
            line_numbers: true,
            highlight_current_line: true,
        }
    }
}

/// Search defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Match case
    pub case_sensitive: bool,

    /// Continue from the other end of the document
    pub wrap: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            case_sensitive: false,
            wrap: true,
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config directory not found")]
    NoConfigDir,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.editor.undo_limit, None);
        assert_eq!(config.view.font_size, 11.0);
        assert_eq!(config.view.zoom_step, 10);
        assert!(config.search.wrap);
        assert!(!config.search.case_sensitive);
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let parsed: Config = toml::from_str("[view]\nfont_size = 14.0\n").unwrap();
        assert_eq!(parsed.view.font_size, 14.0);
        assert_eq!(parsed.view.visible_lines, 40);
        assert_eq!(parsed.editor, EditorConfig::default());
    }

    #[test]
    fn test_undo_limit_is_opt_in() {
        let parsed: Config = toml::from_str("[editor]\nundo_limit = 50\n").unwrap();
        assert_eq!(parsed.editor.undo_limit, Some(50));
        assert!(parsed.editor.coalesce_typing);
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.search.case_sensitive = true;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert!(loaded.search.case_sensitive);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "editor = 3").unwrap();

        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::Parse(_))
        ));
    }
}
