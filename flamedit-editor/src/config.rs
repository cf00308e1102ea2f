use flamedit_core::settings::EditorSettings;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Persistent editor configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoredConfig {
    #[serde(default)]
    pub editor: EditorSettings,
}

/// Loads and saves [`StoredConfig`] at the platform config location or an
/// explicit path
pub struct SettingsStore {
    path: Option<PathBuf>,
    pub config: StoredConfig,
}

impl SettingsStore {
    /// Load config from `path`, or the standard location
    /// Returns default config if the file doesn't exist or is malformed
    pub fn load(path: Option<PathBuf>) -> Self {
        let path = path.or_else(|| match Self::default_path() {
            Ok(p) => Some(p),
            Err(e) => {
                log::warn!("Failed to determine config directory: {}", e);
                None
            }
        });

        let config = match path.as_deref().map(Self::try_load) {
            Some(Ok(config)) => config,
            Some(Err(e)) => {
                log::warn!("Failed to load settings: {}; using defaults", e);
                StoredConfig::default()
            }
            None => StoredConfig::default(),
        };

        Self { path, config }
    }

    fn try_load(path: &Path) -> Result<StoredConfig, Box<dyn std::error::Error>> {
        if !path.exists() {
            return Ok(StoredConfig::default());
        }
        let contents = std::fs::read_to_string(path)?;
        let mut config: StoredConfig = serde_json::from_str(&contents)?;
        config.editor.validate();
        log::debug!("Loaded settings from {}", path.display());
        Ok(config)
    }

    /// Save config; logs but doesn't fail if the save fails
    pub fn save(&self) {
        if let Err(e) = self.try_save() {
            log::warn!("Failed to save settings: {}", e);
        }
    }

    /// Save atomically (write to temp, then rename)
    fn try_save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let path = self.path.as_ref().ok_or("no settings path")?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(&self.config)?;
        let temp_path = path.with_extension("json.tmp");
        std::fs::write(&temp_path, json)?;
        std::fs::rename(temp_path, path)?;
        Ok(())
    }

    fn default_path() -> Result<PathBuf, Box<dyn std::error::Error>> {
        use directories::ProjectDirs;

        let proj_dirs =
            ProjectDirs::from("", "", "flamedit").ok_or("Failed to determine config directory")?;

        Ok(proj_dirs.config_dir().join("settings.json"))
    }

    pub fn settings(&self) -> EditorSettings {
        self.config.editor.clone()
    }

    pub fn set_settings(&mut self, settings: EditorSettings) {
        self.config.editor = settings;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flamedit_core::settings::PivotMode;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("flamedit-{}-{}.json", name, std::process::id()))
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let store = SettingsStore::load(Some(temp_path("missing")));
        assert_eq!(store.settings(), EditorSettings::default());
    }

    #[test]
    fn test_save_and_reload() {
        let path = temp_path("reload");
        let mut store = SettingsStore::load(Some(path.clone()));
        let mut settings = store.settings();
        settings.grid_visible = true;
        settings.pivot_mode = PivotMode::Center;
        store.set_settings(settings.clone());
        store.save();

        let reloaded = SettingsStore::load(Some(path.clone()));
        assert_eq!(reloaded.settings(), settings);
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_invalid_colour_is_replaced_on_load() {
        let path = temp_path("colour");
        std::fs::write(&path, r#"{ "editor": { "grid_color": "red", "grid_visible": true } }"#).unwrap();
        let store = SettingsStore::load(Some(path.clone()));
        assert_eq!(store.settings().grid_color, "#999999");
        assert!(store.settings().grid_visible);
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_malformed_file_gives_defaults() {
        let path = temp_path("malformed");
        std::fs::write(&path, "not json").unwrap();
        let store = SettingsStore::load(Some(path.clone()));
        assert_eq!(store.settings(), EditorSettings::default());
        let _ = std::fs::remove_file(path);
    }
}
