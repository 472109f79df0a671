//! Configuration service implementation.
//!
//! Loads [`AppConfig`] from `config.toml` in the configuration directory.

use crate::paths::DominoPaths;
use crate::storage::AtomicTomlFile;
use domino_core::AppConfig;
use domino_core::error::Result;
use std::path::{Path, PathBuf};

/// Loads and saves the application configuration file.
pub struct ConfigService {
    file: AtomicTomlFile<AppConfig>,
}

impl ConfigService {
    pub fn new(path: PathBuf) -> Self {
        Self {
            file: AtomicTomlFile::new(path),
        }
    }

    /// Creates a service for the platform config location, if one exists.
    pub fn default_location() -> Option<Self> {
        match DominoPaths::config_file() {
            Ok(path) => Some(Self::new(path)),
            Err(e) => {
                tracing::warn!("No configuration directory: {}", e);
                None
            }
        }
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Returns the stored configuration.
    ///
    /// A missing file yields defaults. An unreadable file also yields
    /// defaults and logs a warning.
    pub fn load(&self) -> AppConfig {
        match self.file.load() {
            Ok(Some(config)) => config,
            Ok(None) => {
                tracing::debug!("No config at {:?}, using defaults", self.file.path());
                AppConfig::default()
            }
            Err(e) => {
                tracing::warn!(
                    "Ignoring unreadable config {:?}: {}",
                    self.file.path(),
                    e
                );
                AppConfig::default()
            }
        }
    }

    pub fn save(&self, config: &AppConfig) -> Result<()> {
        self.file.save(config)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let service = ConfigService::new(temp_dir.path().join("config.toml"));
        assert_eq!(service.load(), AppConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let service = ConfigService::new(temp_dir.path().join("config.toml"));

        let config = AppConfig {
            default_target_score: 150,
            preferred_language: Some("es".to_string()),
            ..AppConfig::default()
        };
        service.save(&config).unwrap();

        assert_eq!(service.load(), config);
    }

    #[test]
    fn test_corrupt_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "max_players = \"many\"").unwrap();

        assert_eq!(ConfigService::new(path).load(), AppConfig::default());
    }
}
