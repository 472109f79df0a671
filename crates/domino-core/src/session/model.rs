//! Game configuration and live session models.

use crate::error::{DominoError, Result};
use crate::ledger::ScoreLedger;
use crate::participant::{GameMode, Participant, ParticipantRegistry};
use crate::win::WinEvaluator;
use serde::{Deserialize, Serialize};
use strum::Display;
use uuid::Uuid;

/// Default score a participant must reach to win.
pub const DEFAULT_TARGET_SCORE: u32 = 200;

/// Lifecycle phase of the game controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum GamePhase {
    /// No session has been started yet.
    Setup,
    /// Scores are being recorded.
    InProgress,
    /// A participant reached the target score.
    Complete,
}

/// Immutable settings of one game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameConfiguration {
    pub mode: GameMode,
    pub target_score: u32,
    pub participants: Vec<Participant>,
}

impl GameConfiguration {
    /// Builds a configuration from already-resolved participants.
    ///
    /// # Errors
    ///
    /// Returns `InvalidSetup` for a zero target, an empty participant list or
    /// participant indices that are not `0..n` in order.
    pub fn new(mode: GameMode, target_score: u32, participants: Vec<Participant>) -> Result<Self> {
        let configuration = Self {
            mode,
            target_score,
            participants,
        };
        configuration.check()?;
        Ok(configuration)
    }

    /// Verifies a configuration and ledger rebuilt from storage.
    ///
    /// Stored records bypass `new`, so the same rules are applied here, along
    /// with one score sequence per participant.
    pub fn ensure_consistent(&self, ledger: &ScoreLedger) -> Result<()> {
        self.check()?;
        if ledger.participant_count() != self.participant_count() {
            return Err(DominoError::invalid_setup(format!(
                "{} score lists for {} participants",
                ledger.participant_count(),
                self.participant_count()
            )));
        }
        Ok(())
    }

    fn check(&self) -> Result<()> {
        if self.target_score == 0 {
            return Err(DominoError::invalid_setup("target score must be positive"));
        }
        if self.participants.is_empty() {
            return Err(DominoError::invalid_setup("a game needs participants"));
        }
        if self.participants.iter().enumerate().any(|(i, p)| p.index != i) {
            return Err(DominoError::invalid_setup(
                "participant indices must follow entry order",
            ));
        }
        Ok(())
    }

    /// Resolves names through `registry` and builds the configuration.
    pub fn from_names<S: AsRef<str>>(
        registry: &ParticipantRegistry,
        mode: GameMode,
        target_score: u32,
        names: &[S],
    ) -> Result<Self> {
        let participants = registry.resolve(mode, names)?;
        Self::new(mode, target_score, participants)
    }

    pub fn participant_count(&self) -> usize {
        self.participants.len()
    }

    pub fn participant(&self, index: usize) -> Result<&Participant> {
        self.participants
            .get(index)
            .ok_or(DominoError::ParticipantOutOfRange {
                index,
                count: self.participants.len(),
            })
    }

    pub fn names(&self) -> Vec<String> {
        self.participants.iter().map(|p| p.name.clone()).collect()
    }

    pub fn evaluator(&self) -> WinEvaluator {
        WinEvaluator::new(self.target_score)
    }

    /// Checks that a saved session recorded under `saved` can be resumed
    /// under this configuration.
    ///
    /// Mode, target score and participant count must all be identical.
    /// Participant names are not compared.
    pub fn ensure_compatible(&self, saved: &GameConfiguration) -> Result<()> {
        if self.mode != saved.mode {
            return Err(DominoError::mismatch(format!(
                "mode {} != saved {}",
                self.mode, saved.mode
            )));
        }
        if self.target_score != saved.target_score {
            return Err(DominoError::mismatch(format!(
                "target score {} != saved {}",
                self.target_score, saved.target_score
            )));
        }
        if self.participant_count() != saved.participant_count() {
            return Err(DominoError::mismatch(format!(
                "participant count {} != saved {}",
                self.participant_count(),
                saved.participant_count()
            )));
        }
        Ok(())
    }
}

/// One game in progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSession {
    /// Unique session identifier (UUID format)
    pub id: String,
    pub configuration: GameConfiguration,
    pub ledger: ScoreLedger,
    /// Timestamp when the session was created (RFC 3339)
    pub created_at: String,
    /// Timestamp of the last ledger mutation (RFC 3339)
    pub updated_at: String,
}

impl GameSession {
    /// Starts a fresh session with a zero seed entry per participant.
    pub fn new(configuration: GameConfiguration) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        let ledger = ScoreLedger::seeded(configuration.participant_count());
        Self {
            id: Uuid::new_v4().to_string(),
            configuration,
            ledger,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Marks the session as modified now.
    pub fn touch(&mut self) {
        self.updated_at = chrono::Utc::now().to_rfc3339();
    }

    /// Zeroes the ledger and gives the session a new identity.
    pub fn restart(&mut self) {
        self.ledger.reseed();
        self.id = Uuid::new_v4().to_string();
        self.created_at = chrono::Utc::now().to_rfc3339();
        self.updated_at = self.created_at.clone();
    }
}
