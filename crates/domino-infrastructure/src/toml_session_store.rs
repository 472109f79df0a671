//! TOML-based SessionStore implementation.

use crate::dto::{
    HistoryLogDocument, load_active_session, store_active_session, store_history_entry,
};
use crate::paths::DominoPaths;
use crate::storage::{AtomicTomlFile, StorageError};
use async_trait::async_trait;
use domino_core::error::{DominoError, Result};
use domino_core::session::resumable;
use domino_core::{GameConfiguration, GameSession, HistoryEntry, SessionStore};
use std::path::Path;
use std::sync::Arc;

/// A session store keeping two TOML documents in one data directory.
///
/// ```text
/// data_dir/
/// ├── active_session.toml
/// └── history.toml
/// ```
///
/// File I/O is blocking and runs on tokio's blocking pool. Records go through
/// the version-migrate migrators in `crate::dto`.
#[derive(Clone)]
pub struct TomlSessionStore {
    active: Arc<AtomicTomlFile<toml::Value>>,
    history: Arc<AtomicTomlFile<HistoryLogDocument>>,
}

impl TomlSessionStore {
    /// Creates a store rooted at `data_dir`.
    ///
    /// The directory is created on first write, so a read-only or missing
    /// location only surfaces as persistence errors during play.
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        let data_dir = data_dir.as_ref();
        Self {
            active: Arc::new(AtomicTomlFile::new(DominoPaths::active_session_file(
                data_dir,
            ))),
            history: Arc::new(AtomicTomlFile::new(DominoPaths::history_file(data_dir))),
        }
    }

    /// Loads and migrates the active record.
    ///
    /// Unparseable content, an unknown schema version and inconsistent fields
    /// all read as no save at all.
    fn read_active(file: &AtomicTomlFile<toml::Value>) -> Result<Option<GameSession>> {
        let value = match file.load() {
            Ok(Some(value)) => value,
            Ok(None) => return Ok(None),
            Err(e) if e.is_corrupt() => {
                tracing::warn!("Ignoring corrupt active session {:?}: {}", file.path(), e);
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        match load_active_session(value) {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                tracing::warn!("Ignoring unreadable active session {:?}: {}", file.path(), e);
                Ok(None)
            }
        }
    }
}

async fn run_blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| DominoError::persistence(format!("Failed to join task: {}", e)))?
}

#[async_trait]
impl SessionStore for TomlSessionStore {
    async fn save_active(&self, session: &GameSession) -> Result<()> {
        let file = self.active.clone();
        let record = store_active_session(session)?;
        run_blocking(move || {
            file.save(&record)?;
            Ok(())
        })
        .await
    }

    async fn load_active(&self, configuration: &GameConfiguration) -> Result<Option<GameSession>> {
        let file = self.active.clone();
        let saved = run_blocking(move || Self::read_active(&file)).await?;
        Ok(resumable(saved, configuration))
    }

    async fn active_configuration(&self) -> Result<Option<GameConfiguration>> {
        let file = self.active.clone();
        let saved = run_blocking(move || Self::read_active(&file)).await?;
        Ok(saved.map(|session| session.configuration))
    }

    async fn clear_active(&self) -> Result<()> {
        let file = self.active.clone();
        run_blocking(move || {
            file.remove()?;
            Ok(())
        })
        .await
    }

    async fn append_history(&self, entry: &HistoryEntry) -> Result<()> {
        let file = self.history.clone();
        let record = store_history_entry(entry)?;
        run_blocking(move || {
            file.update(
                HistoryLogDocument::default(),
                Some(HistoryLogDocument::default()),
                |log| log.entries.insert(0, record),
            )?;
            Ok(())
        })
        .await
    }

    async fn load_history(&self) -> Result<Vec<HistoryEntry>> {
        let file = self.history.clone();
        run_blocking(move || match file.load() {
            Ok(Some(log)) => log.into_domain(),
            Ok(None) => Ok(Vec::new()),
            Err(StorageError::Parse(e)) => {
                tracing::warn!("Ignoring corrupt history {:?}: {}", file.path(), e);
                Ok(Vec::new())
            }
            Err(e) => Err(e.into()),
        })
        .await
    }

    async fn clear_history(&self) -> Result<()> {
        let file = self.history.clone();
        run_blocking(move || {
            file.remove()?;
            Ok(())
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domino_core::{GameMode, ParticipantRegistry};
    use tempfile::TempDir;

    fn configuration(target: u32) -> GameConfiguration {
        GameConfiguration::from_names(
            &ParticipantRegistry::default(),
            GameMode::Teams,
            target,
            &["Team A", "Team B"],
        )
        .unwrap()
    }

    fn played_session() -> GameSession {
        let mut session = GameSession::new(configuration(200));
        session.ledger.add_score(0, 45).unwrap();
        session.ledger.add_score(1, 30).unwrap();
        session.ledger.add_score(0, 25).unwrap();
        session
    }

    #[tokio::test]
    async fn test_save_and_load_active() {
        let temp_dir = TempDir::new().unwrap();
        let store = TomlSessionStore::new(temp_dir.path());
        let session = played_session();

        store.save_active(&session).await.unwrap();
        let loaded = store.load_active(&configuration(200)).await.unwrap();

        assert_eq!(loaded, Some(session));
    }

    #[tokio::test]
    async fn test_load_active_with_other_target_is_none() {
        let temp_dir = TempDir::new().unwrap();
        let store = TomlSessionStore::new(temp_dir.path());
        store.save_active(&played_session()).await.unwrap();

        assert!(store.load_active(&configuration(150)).await.unwrap().is_none());
        // The save itself is untouched
        assert!(store.active_configuration().await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_corrupt_active_is_none() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("active_session.toml"), "id = ").unwrap();
        let store = TomlSessionStore::new(temp_dir.path());

        assert!(store.load_active(&configuration(200)).await.unwrap().is_none());
        assert!(store.active_configuration().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unknown_version_is_not_resumed() {
        let temp_dir = TempDir::new().unwrap();
        let store = TomlSessionStore::new(temp_dir.path());
        let session = played_session();
        store.save_active(&session).await.unwrap();

        let path = temp_dir.path().join("active_session.toml");
        let saved = std::fs::read_to_string(&path).unwrap();
        assert!(saved.contains("version = \"1.0.0\""));
        std::fs::write(&path, saved.replace("version = \"1.0.0\"", "version = \"9.0.0\"")).unwrap();

        assert!(store.load_active(&configuration(200)).await.unwrap().is_none());
        assert!(store.active_configuration().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_inconsistent_active_is_none() {
        let temp_dir = TempDir::new().unwrap();
        let store = TomlSessionStore::new(temp_dir.path());
        store.save_active(&played_session()).await.unwrap();

        let path = temp_dir.path().join("active_session.toml");
        let saved = std::fs::read_to_string(&path).unwrap();
        std::fs::write(&path, saved.replace("target_score = 200", "target_score = 0")).unwrap();

        assert!(store.active_configuration().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_clear_active() {
        let temp_dir = TempDir::new().unwrap();
        let store = TomlSessionStore::new(temp_dir.path());
        store.save_active(&played_session()).await.unwrap();

        store.clear_active().await.unwrap();
        store.clear_active().await.unwrap();

        assert!(store.load_active(&configuration(200)).await.unwrap().is_none());
        assert!(!temp_dir.path().join("active_session.toml").exists());
    }

    #[tokio::test]
    async fn test_history_is_most_recent_first() {
        let temp_dir = TempDir::new().unwrap();
        let store = TomlSessionStore::new(temp_dir.path());

        let first = HistoryEntry::completed(&played_session(), "Team A");
        let second = HistoryEntry::completed(&played_session(), "Team B");
        store.append_history(&first).await.unwrap();
        store.append_history(&second).await.unwrap();

        let history = store.load_history().await.unwrap();
        assert_eq!(history, vec![second, first]);
    }

    #[tokio::test]
    async fn test_missing_and_corrupt_history_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let store = TomlSessionStore::new(temp_dir.path());
        assert!(store.load_history().await.unwrap().is_empty());

        std::fs::write(temp_dir.path().join("history.toml"), "[[entries]\n").unwrap();
        assert!(store.load_history().await.unwrap().is_empty());

        // Appending over a corrupt log moves it aside and starts a fresh one
        let entry = HistoryEntry::completed(&played_session(), "Team A");
        store.append_history(&entry).await.unwrap();
        assert_eq!(store.load_history().await.unwrap(), vec![entry]);

        let backup = temp_dir.path().join("history.toml.corrupt");
        assert_eq!(std::fs::read_to_string(backup).unwrap(), "[[entries]\n");
    }

    #[tokio::test]
    async fn test_clear_history() {
        let temp_dir = TempDir::new().unwrap();
        let store = TomlSessionStore::new(temp_dir.path());
        let entry = HistoryEntry::completed(&played_session(), "Team A");
        store.append_history(&entry).await.unwrap();

        store.clear_history().await.unwrap();

        assert!(store.load_history().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unwritable_location_reports_persistence_error() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("not-a-dir");
        std::fs::write(&blocker, "file").unwrap();
        let store = TomlSessionStore::new(&blocker);

        let err = store.save_active(&played_session()).await.unwrap_err();
        assert!(err.is_persistence());
    }
}
