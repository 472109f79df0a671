//! In-memory SessionStore implementation.

use async_trait::async_trait;
use domino_core::error::Result;
use domino_core::session::resumable;
use domino_core::{GameConfiguration, GameSession, HistoryEntry, SessionStore};
use tokio::sync::Mutex;

/// A session store that lives only as long as the process.
///
/// Used for ephemeral play and for exercising the controller without touching
/// the file system.
#[derive(Default)]
pub struct InMemorySessionStore {
    active: Mutex<Option<GameSession>>,
    history: Mutex<Vec<HistoryEntry>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the raw active slot without applying the resume rule.
    pub async fn active_snapshot(&self) -> Option<GameSession> {
        self.active.lock().await.clone()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn save_active(&self, session: &GameSession) -> Result<()> {
        *self.active.lock().await = Some(session.clone());
        Ok(())
    }

    async fn load_active(&self, configuration: &GameConfiguration) -> Result<Option<GameSession>> {
        let saved = self.active.lock().await.clone();
        Ok(resumable(saved, configuration))
    }

    async fn active_configuration(&self) -> Result<Option<GameConfiguration>> {
        Ok(self
            .active
            .lock()
            .await
            .as_ref()
            .map(|session| session.configuration.clone()))
    }

    async fn clear_active(&self) -> Result<()> {
        *self.active.lock().await = None;
        Ok(())
    }

    async fn append_history(&self, entry: &HistoryEntry) -> Result<()> {
        self.history.lock().await.insert(0, entry.clone());
        Ok(())
    }

    async fn load_history(&self) -> Result<Vec<HistoryEntry>> {
        Ok(self.history.lock().await.clone())
    }

    async fn clear_history(&self) -> Result<()> {
        self.history.lock().await.clear();
        Ok(())
    }
}
