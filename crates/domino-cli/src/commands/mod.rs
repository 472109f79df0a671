pub mod game;
pub mod score;
pub mod show;

use anyhow::{Context as _, Result, bail};
use domino_application::{GameController, SessionStart};
use domino_core::AppConfig;
use domino_infrastructure::{ConfigService, DominoPaths, TomlSessionStore};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Everything a command needs for one invocation.
pub struct Context {
    pub config: AppConfig,
    pub data_dir: PathBuf,
    pub controller: GameController,
}

impl Context {
    /// Loads the configuration and opens the store under the resolved data
    /// directory. Must run inside the Tokio runtime.
    pub fn open(data_dir_override: Option<&Path>) -> Result<Self> {
        let config = match ConfigService::default_location() {
            Some(service) => {
                tracing::debug!("Loading configuration from {}", service.path().display());
                service.load()
            }
            None => AppConfig::default(),
        };
        let data_dir = DominoPaths::data_dir(data_dir_override, config.data_dir.as_deref())
            .context("Failed to resolve data directory")?;
        Ok(Self::with_config(config, data_dir))
    }

    /// Opens the store under `data_dir` with an already loaded configuration.
    pub fn with_config(config: AppConfig, data_dir: PathBuf) -> Self {
        tracing::debug!("Using data directory {}", data_dir.display());
        let store = Arc::new(TomlSessionStore::new(&data_dir));
        let controller = GameController::with_config(store, &config);
        Self {
            config,
            data_dir,
            controller,
        }
    }

    /// Resumes the saved game so score commands can act on it.
    pub async fn resume(&mut self) -> Result<()> {
        let Some(configuration) = self.controller.saved_configuration().await else {
            bail!("No game in progress. Start one with `domino new`.");
        };

        match self.controller.start_session(configuration).await {
            SessionStart::RecoveredFinished { winner } => {
                bail!(
                    "The saved game was already won by {}. A new game has been started.",
                    winner
                );
            }
            SessionStart::Fresh | SessionStart::Resumed => Ok(()),
        }
    }
}
