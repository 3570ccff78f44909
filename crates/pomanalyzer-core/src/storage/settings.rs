//! Settings file storage

use crate::{models::Settings, Result};
use std::path::PathBuf;

pub struct SettingsStorage {
    config_dir: PathBuf,
}

impl SettingsStorage {
    pub fn new(config_dir: PathBuf) -> Self {
        Self { config_dir }
    }

    fn path(&self) -> PathBuf {
        self.config_dir.join("config.json")
    }

    pub fn load(&self) -> Result<Settings> {
        let config_path = self.path();

        if !config_path.exists() {
            let settings = Settings::default();
            self.save(&settings)?;
            return Ok(settings);
        }

        let content = std::fs::read_to_string(config_path)?;

        // Handle empty file case
        if content.trim().is_empty() {
            let settings = Settings::default();
            self.save(&settings)?;
            return Ok(settings);
        }

        let settings: Settings = serde_json::from_str(&content)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn save(&self, settings: &Settings) -> Result<()> {
        std::fs::create_dir_all(&self.config_dir)?;

        let content = serde_json::to_string_pretty(settings)?;
        std::fs::write(self.path(), content)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use tempfile::TempDir;

    #[test]
    fn test_load_creates_default_file() {
        let temp_dir = TempDir::new().unwrap();
        let storage = SettingsStorage::new(temp_dir.path().join("pomanalyzer"));

        let settings = storage.load().unwrap();
        assert_eq!(settings, Settings::default());
        assert!(temp_dir.path().join("pomanalyzer/config.json").exists());
    }

    #[test]
    fn test_save_then_load() {
        let temp_dir = TempDir::new().unwrap();
        let storage = SettingsStorage::new(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        settings.pomodoro.pomodoro_duration = 50 * 60;
        settings.storage.in_memory = true;
        storage.save(&settings).unwrap();

        assert_eq!(storage.load().unwrap(), settings);
    }

    #[test]
    fn test_empty_file_falls_back_to_defaults() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("config.json"), "  \n").unwrap();

        let storage = SettingsStorage::new(temp_dir.path().to_path_buf());
        assert_eq!(storage.load().unwrap(), Settings::default());
    }

    #[test]
    fn test_invalid_file_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let storage = SettingsStorage::new(temp_dir.path().to_path_buf());

        std::fs::write(temp_dir.path().join("config.json"), "{ not json").unwrap();
        assert!(matches!(storage.load(), Err(Error::Json(_))));

        let mut settings = Settings::default();
        settings.pomodoro.long_break_duration = 0;
        std::fs::write(
            temp_dir.path().join("config.json"),
            serde_json::to_string(&settings).unwrap(),
        )
        .unwrap();
        assert!(matches!(storage.load(), Err(Error::Validation(_))));
    }
}
