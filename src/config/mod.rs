//! Configuration system for webpen
//!
//! Loads settings from ~/.config/webpen/config.toml. Missing or malformed
//! config falls back to defaults with a warning on stderr; a bad config
//! file never prevents a session from starting.

use serde::Deserialize;
use std::path::PathBuf;

/// Main settings structure
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub preview: PreviewSettings,
    pub export: ExportSettings,
}

/// Preview assembly settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PreviewSettings {
    /// Entry document looked up when running a project (default: "index.html")
    pub entry_file: String,
    /// Inject the console-forwarding bridge into preview documents (default: true)
    pub inject_console_bridge: bool,
}

impl Default for PreviewSettings {
    fn default() -> Self {
        Self {
            entry_file: "index.html".to_string(),
            inject_console_bridge: true,
        }
    }
}

/// Project export settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// Default archive file name (default: "project.zip")
    pub archive_name: String,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            archive_name: "project.zip".to_string(),
        }
    }
}

fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("webpen").join("config.toml"))
}

/// Load settings from the config file, falling back to defaults on any
/// failure.
pub fn load_config() -> Settings {
    let Some(path) = config_path() else {
        return Settings::default();
    };

    if !path.exists() {
        return Settings::default();
    }

    match std::fs::read_to_string(&path) {
        Ok(content) => match toml::from_str::<Settings>(&content) {
            Ok(settings) => settings,
            Err(e) => {
                eprintln!("Warning: Failed to parse config file: {}", e);
                Settings::default()
            }
        },
        Err(e) => {
            eprintln!("Warning: Failed to read config file: {}", e);
            Settings::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.preview.entry_file, "index.html");
        assert!(settings.preview.inject_console_bridge);
        assert_eq!(settings.export.archive_name, "project.zip");
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let settings: Settings = toml::from_str(
            r#"
            [preview]
            entry_file = "main.html"
            "#,
        )
        .unwrap();
        assert_eq!(settings.preview.entry_file, "main.html");
        assert!(settings.preview.inject_console_bridge);
        assert_eq!(settings.export.archive_name, "project.zip");
    }

    #[test]
    fn test_full_config() {
        let settings: Settings = toml::from_str(
            r#"
            [preview]
            entry_file = "app.html"
            inject_console_bridge = false

            [export]
            archive_name = "bundle.zip"
            "#,
        )
        .unwrap();
        assert!(!settings.preview.inject_console_bridge);
        assert_eq!(settings.export.archive_name, "bundle.zip");
    }
}
