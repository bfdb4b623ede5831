//! Configuration system for ted
//!
//! Loads settings from ~/.config/ted/config.toml

use serde::Deserialize;
use std::path::PathBuf;

/// Main settings structure
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub editor: EditorSettings,
}

/// Editor behavior settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    /// Number of spaces inserted for a tab (default: 4)
    pub tab_width: usize,
    /// Show line numbers (default: true)
    pub line_numbers: bool,
    /// Show the status line (default: true)
    pub status_line: bool,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            tab_width: 4,
            line_numbers: true,
            status_line: true,
        }
    }
}

/// Path to the user config file
fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("ted").join("config.toml"))
}

/// Load settings from the config file, falling back to defaults when the
/// file is missing or does not parse.
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
    fn defaults() {
        let settings = Settings::default();
        assert_eq!(settings.editor.tab_width, 4);
        assert!(settings.editor.line_numbers);
        assert!(settings.editor.status_line);
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let settings: Settings = toml::from_str(
            r#"
            [editor]
            tab_width = 2
            "#,
        )
        .unwrap();
        assert_eq!(settings.editor.tab_width, 2);
        assert!(settings.editor.line_numbers);
    }

    #[test]
    fn empty_config_parses() {
        let settings: Settings = toml::from_str("").unwrap();
        assert_eq!(settings.editor.tab_width, 4);
    }
}
