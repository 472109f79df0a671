//! Session store trait.
//!
//! Defines the interface for persisting the active game and the history log.

use super::history::HistoryEntry;
use super::model::{GameConfiguration, GameSession};
use crate::error::Result;
use async_trait::async_trait;

/// Durable storage for one active session slot and an append-only history log.
///
/// Implementations are the only components that touch persisted state. Every
/// failure is reported as a persistence error; the controller treats those as
/// non-fatal.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Overwrites the active-session slot.
    async fn save_active(&self, session: &GameSession) -> Result<()>;

    /// Returns the saved session if it can be resumed under `configuration`.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(session))`: a save exists whose mode, target score and
    ///   participant count match
    /// - `Ok(None)`: no save, an incompatible save, or an unreadable save
    /// - `Err(_)`: storage could not be accessed
    async fn load_active(&self, configuration: &GameConfiguration) -> Result<Option<GameSession>>;

    /// Returns the configuration of the saved session, if any.
    async fn active_configuration(&self) -> Result<Option<GameConfiguration>>;

    /// Removes the active-session slot. Succeeds when the slot is already empty.
    async fn clear_active(&self) -> Result<()>;

    /// Prepends `entry` to the history log.
    async fn append_history(&self, entry: &HistoryEntry) -> Result<()>;

    /// Returns the history log, most recent first.
    ///
    /// A missing or corrupt log yields an empty list.
    async fn load_history(&self) -> Result<Vec<HistoryEntry>>;

    /// Removes every history entry.
    async fn clear_history(&self) -> Result<()>;
}

/// Applies the resume rule shared by all stores to a raw saved session.
pub fn resumable(
    saved: Option<GameSession>,
    configuration: &GameConfiguration,
) -> Option<GameSession> {
    let saved = saved?;
    match configuration.ensure_compatible(&saved.configuration) {
        Ok(()) => Some(saved),
        Err(e) => {
            tracing::info!("Ignoring saved session {}: {}", saved.id, e);
            None
        }
    }
}
