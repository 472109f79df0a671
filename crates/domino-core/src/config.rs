//! Application configuration model.

use crate::participant::DEFAULT_MAX_PLAYERS;
use crate::session::DEFAULT_TARGET_SCORE;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root of `config.toml`.
///
/// Every field has a default, so a partial or missing file still loads.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    /// Directory holding the active session and history files.
    /// `None` uses the platform data directory.
    pub data_dir: Option<PathBuf>,
    pub default_target_score: u32,
    pub max_players: usize,
    /// Passed through to presentation code; the engine never reads it.
    pub preferred_language: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            default_target_score: DEFAULT_TARGET_SCORE,
            max_players: DEFAULT_MAX_PLAYERS,
            preferred_language: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: AppConfig = toml::from_str("preferred_language = \"es\"").unwrap();
        assert_eq!(config.preferred_language.as_deref(), Some("es"));
        assert_eq!(config.default_target_score, DEFAULT_TARGET_SCORE);
        assert_eq!(config.max_players, DEFAULT_MAX_PLAYERS);
        assert!(config.data_dir.is_none());
    }
}
