//! Path management for configuration and game data.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/domino/            # Config directory
//! └── config.toml              # Application configuration
//!
//! ~/.local/share/domino/       # Data directory (overridable)
//! ├── active_session.toml      # Game in progress
//! └── history.toml             # Completed games, most recent first
//! ```

use std::path::{Path, PathBuf};

const APP_DIR: &str = "domino";

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "DOMINO_DATA_DIR";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Platform directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Resolves where the application keeps its files.
pub struct DominoPaths;

impl DominoPaths {
    /// Returns the configuration directory (e.g., `~/.config/domino/`).
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Returns the path to `config.toml`.
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Returns the platform data directory (e.g., `~/.local/share/domino/`).
    pub fn default_data_dir() -> Result<PathBuf, PathError> {
        dirs::data_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Picks the data directory.
    ///
    /// Precedence: explicit override, then `DOMINO_DATA_DIR`, then the
    /// configured directory, then the platform default.
    pub fn data_dir(
        explicit: Option<&Path>,
        configured: Option<&Path>,
    ) -> Result<PathBuf, PathError> {
        if let Some(dir) = explicit {
            return Ok(dir.to_path_buf());
        }
        if let Some(dir) = std::env::var_os(DATA_DIR_ENV).filter(|v| !v.is_empty()) {
            return Ok(PathBuf::from(dir));
        }
        if let Some(dir) = configured {
            return Ok(dir.to_path_buf());
        }
        Self::default_data_dir()
    }

    pub fn active_session_file(data_dir: &Path) -> PathBuf {
        data_dir.join("active_session.toml")
    }

    pub fn history_file(data_dir: &Path) -> PathBuf {
        data_dir.join("history.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_file() {
        let config_file = DominoPaths::config_file().unwrap();
        assert!(config_file.ends_with("domino/config.toml"));
        assert!(config_file.starts_with(DominoPaths::config_dir().unwrap()));
    }

    #[test]
    fn test_explicit_data_dir_wins() {
        let dir = DominoPaths::data_dir(Some(Path::new("/tmp/a")), Some(Path::new("/tmp/b")));
        assert_eq!(dir.unwrap(), PathBuf::from("/tmp/a"));
    }

    #[test]
    fn test_data_files() {
        let dir = Path::new("/tmp/domino");
        assert_eq!(
            DominoPaths::active_session_file(dir),
            PathBuf::from("/tmp/domino/active_session.toml")
        );
        assert_eq!(
            DominoPaths::history_file(dir),
            PathBuf::from("/tmp/domino/history.toml")
        );
    }
}
