//! Application configuration management
//!
//! Persists UI preferences only. Document content and title are never
//! stored; every session starts with an empty default document.

use std::path::PathBuf;

use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::core::document::{FontFamilyChoice, FontStep, RunStyle};

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Directory of the most recent export, used to seed the save dialog
    pub last_export_dir: Option<PathBuf>,
    /// Editor settings
    pub editor: EditorConfig,
    /// UI settings
    pub ui: UiConfig,
}

/// Editor-specific settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Default font family for new documents
    pub font_family: FontFamilyChoice,
    /// Default font size step (1-7)
    pub font_size: u8,
}

/// UI settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Theme (light/dark)
    pub theme: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            last_export_dir: None,
            editor: EditorConfig::default(),
            ui: UiConfig::default(),
        }
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            font_family: FontFamilyChoice::TimesNewRoman,
            font_size: FontStep::default().get(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            theme: "light".to_string(),
        }
    }
}

impl EditorConfig {
    /// Run style used for the first insertion into an empty document.
    pub fn default_style(&self) -> RunStyle {
        RunStyle {
            font: self.font_family,
            size: FontStep::new(self.font_size),
            ..RunStyle::default()
        }
    }
}

impl AppConfig {
    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "scriptum", "Scriptum")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load configuration from disk
    pub fn load() -> Result<Self> {
        let path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)?;
        let config: Self = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        // Ensure config directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, content)?;

        tracing::info!("Saved config to: {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_style_reflects_editor_settings() {
        let editor = EditorConfig {
            font_family: FontFamilyChoice::Calibri,
            font_size: 5,
        };
        let style = editor.default_style();
        assert_eq!(style.font, FontFamilyChoice::Calibri);
        assert_eq!(style.size.get(), 5);
        assert!(!style.bold);
    }

    #[test]
    fn test_config_round_trips_through_json() {
        let mut config = AppConfig::default();
        config.last_export_dir = Some(PathBuf::from("/tmp/exports"));
        config.editor.font_family = FontFamilyChoice::Arial;
        config.ui.theme = "dark".to_string();

        let json = serde_json::to_string(&config).unwrap();
        let restored: AppConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.last_export_dir, config.last_export_dir);
        assert_eq!(restored.editor.font_family, FontFamilyChoice::Arial);
        assert_eq!(restored.ui.theme, "dark");
    }

    #[test]
    fn test_out_of_range_font_size_is_clamped_at_use() {
        let editor = EditorConfig {
            font_family: FontFamilyChoice::TimesNewRoman,
            font_size: 12,
        };
        assert_eq!(editor.default_style().size.get(), 7);
    }
}
