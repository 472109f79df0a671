//! Completed game snapshots.

use super::model::{GameConfiguration, GameSession};
use crate::ledger::ScoreLedger;
use serde::{Deserialize, Serialize};

/// An immutable record of a finished game.
///
/// Entries are created once and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// ID of the session this entry was recorded from
    pub session_id: String,
    /// Timestamp when the game finished (RFC 3339)
    pub timestamp: String,
    pub configuration: GameConfiguration,
    pub final_ledger: ScoreLedger,
    /// Winner's display name, absent for an abandoned game
    pub winner: Option<String>,
}

impl HistoryEntry {
    /// Snapshots `session` as won by `winner`.
    pub fn completed(session: &GameSession, winner: impl Into<String>) -> Self {
        Self {
            session_id: session.id.clone(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            configuration: session.configuration.clone(),
            final_ledger: session.ledger.clone(),
            winner: Some(winner.into()),
        }
    }

    pub fn final_totals(&self) -> Vec<u64> {
        self.final_ledger.totals()
    }
}
