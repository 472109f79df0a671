//! Game controller implementation.
//!
//! `GameController` owns the live session. It validates score commands,
//! mutates the ledger, checks for a winner and hands every resulting write to
//! the persistence queue.

use crate::persistence::PersistenceQueue;
use crate::view_model::GameView;
use domino_core::error::{DominoError, Result};
use domino_core::{
    AppConfig, GameConfiguration, GameMode, GamePhase, GameSession, HistoryEntry, Participant,
    ParticipantRegistry, SessionStore,
};
use std::sync::Arc;

/// How `start_session` obtained its ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStart {
    /// No compatible save existed; every participant starts at zero.
    Fresh,
    /// A compatible save was resumed.
    Resumed,
    /// The save already had a winner; it was archived and a fresh game began.
    RecoveredFinished { winner: String },
}

/// Result of a successful `submit_score`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreOutcome {
    pub participant: usize,
    pub total: u64,
    /// Set when this score ended the game
    pub winner: Option<Participant>,
}

impl ScoreOutcome {
    pub fn is_game_over(&self) -> bool {
        self.winner.is_some()
    }
}

/// Result of a successful `delete_score`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteOutcome {
    pub participant: usize,
    pub removed: u32,
    pub total: u64,
}

/// Orchestrates score entry, win detection and persistence for one game.
///
/// # Phases
///
/// `Setup → InProgress → Complete`. Scores can only be added or removed while
/// in progress. `reset_session` returns a started game to `InProgress`, and
/// `start_session` may be called in any phase to begin another game.
///
/// Storage failures never fail an operation: the in-memory session is
/// authoritative and the next mutation writes it again.
pub struct GameController {
    store: Arc<dyn SessionStore>,
    persistence: PersistenceQueue,
    registry: ParticipantRegistry,
    preferred_language: Option<String>,
    phase: GamePhase,
    session: Option<GameSession>,
    winner: Option<Participant>,
}

impl GameController {
    /// Creates a controller backed by `store`.
    ///
    /// Must be called inside a Tokio runtime; the persistence worker is
    /// spawned here.
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self {
            persistence: PersistenceQueue::spawn(store.clone()),
            store,
            registry: ParticipantRegistry::default(),
            preferred_language: None,
            phase: GamePhase::Setup,
            session: None,
            winner: None,
        }
    }

    /// Creates a controller using limits and pass-through settings from `config`.
    pub fn with_config(store: Arc<dyn SessionStore>, config: &AppConfig) -> Self {
        let mut controller = Self::new(store);
        controller.registry = ParticipantRegistry::new(config.max_players);
        controller.preferred_language = config.preferred_language.clone();
        controller
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn session(&self) -> Option<&GameSession> {
        self.session.as_ref()
    }

    /// Language the presentation layer should render in, if configured.
    pub fn preferred_language(&self) -> Option<&str> {
        self.preferred_language.as_deref()
    }

    /// Number of background writes that have failed so far.
    pub fn failed_writes(&self) -> usize {
        self.persistence.failed_writes()
    }

    /// Builds a configuration from setup input using this controller's registry.
    pub fn configure<S: AsRef<str>>(
        &self,
        mode: GameMode,
        target_score: u32,
        names: &[S],
    ) -> Result<GameConfiguration> {
        GameConfiguration::from_names(&self.registry, mode, target_score, names)
    }

    /// Returns the configuration of the saved game, if storage has one.
    pub async fn saved_configuration(&self) -> Option<GameConfiguration> {
        self.persistence.flush().await;
        match self.store.active_configuration().await {
            Ok(configuration) => configuration,
            Err(e) => {
                tracing::warn!("Failed to read saved configuration: {}", e);
                None
            }
        }
    }

    /// Begins a game under `configuration`, resuming a compatible save.
    pub async fn start_session(&mut self, configuration: GameConfiguration) -> SessionStart {
        self.persistence.flush().await;

        let saved = match self.store.load_active(&configuration).await {
            Ok(saved) => saved,
            Err(e) => {
                tracing::warn!("Failed to load saved session, starting fresh: {}", e);
                None
            }
        };

        let (session, start) = match saved {
            Some(saved) => {
                let finished = configuration
                    .evaluator()
                    .evaluate_ledger(&saved.ledger, &saved.configuration.participants);
                match finished.winner {
                    Some(winner) => {
                        self.archive_stale(&saved, &winner).await;
                        (
                            GameSession::new(configuration),
                            SessionStart::RecoveredFinished { winner: winner.name },
                        )
                    }
                    None => {
                        tracing::info!("Resuming session {}", saved.id);
                        let resumed = GameSession {
                            configuration,
                            ..saved
                        };
                        (resumed, SessionStart::Resumed)
                    }
                }
            }
            None => (GameSession::new(configuration), SessionStart::Fresh),
        };

        tracing::info!(
            "Session {} in progress ({} participants, target {})",
            session.id,
            session.configuration.participant_count(),
            session.configuration.target_score
        );
        self.persistence.save_active(session.clone());
        self.session = Some(session);
        self.winner = None;
        self.phase = GamePhase::InProgress;
        start
    }

    /// Records `amount` for `participant`.
    ///
    /// # Errors
    ///
    /// - `InvalidState` unless the game is in progress
    /// - `InvalidAmount` for zero, negative or oversized amounts
    /// - `ParticipantOutOfRange` for an unknown participant
    ///
    /// A rejected call leaves the ledger untouched.
    pub fn submit_score(&mut self, participant: usize, amount: i64) -> Result<ScoreOutcome> {
        let amount = u32::try_from(amount)
            .ok()
            .filter(|&a| a > 0)
            .ok_or_else(|| DominoError::invalid_amount(amount.to_string()))?;

        let session = self.active_session_mut("submit a score")?;
        let total = session.ledger.add_score(participant, amount)?;
        session.touch();
        tracing::debug!(
            "Participant {} scored {} (total {})",
            participant,
            amount,
            total
        );

        let outcome = session.configuration.evaluator().after_score(
            &session.ledger,
            &session.configuration.participants,
            participant,
        );
        let snapshot = session.clone();
        self.persistence.save_active(snapshot.clone());

        if let Some(winner) = &outcome.winner {
            tracing::info!(
                "{} reached {} and wins session {}",
                winner.name,
                snapshot.configuration.target_score,
                snapshot.id
            );
            self.persistence
                .append_history(HistoryEntry::completed(&snapshot, winner.name.clone()));
            self.persistence.clear_active();
            self.phase = GamePhase::Complete;
            self.winner = Some(winner.clone());
        }

        Ok(ScoreOutcome {
            participant,
            total,
            winner: outcome.winner,
        })
    }

    /// Parses presentation input and records it.
    ///
    /// Non-numeric text is rejected with `InvalidAmount` like any other bad
    /// amount.
    pub fn submit_score_input(&mut self, participant: usize, raw: &str) -> Result<ScoreOutcome> {
        let amount: i64 = raw
            .trim()
            .parse()
            .map_err(|_| DominoError::invalid_amount(raw))?;
        self.submit_score(participant, amount)
    }

    /// Removes one recorded score. Never ends the game.
    pub fn delete_score(&mut self, participant: usize, score_index: usize) -> Result<DeleteOutcome> {
        let session = self.active_session_mut("delete a score")?;
        let removed = session.ledger.delete_score(participant, score_index)?;
        let total = session.ledger.total(participant)?;
        session.touch();
        tracing::debug!(
            "Removed score {} ({}) from participant {}",
            score_index,
            removed,
            participant
        );

        let snapshot = session.clone();
        self.persistence.save_active(snapshot);

        Ok(DeleteOutcome {
            participant,
            removed,
            total,
        })
    }

    /// Zeroes every participant and clears the saved game.
    ///
    /// Resets are not recorded in history.
    pub fn reset_session(&mut self) -> Result<()> {
        if self.phase == GamePhase::Setup {
            return Err(DominoError::invalid_state("reset the game", self.phase));
        }
        let Some(session) = self.session.as_mut() else {
            return Err(DominoError::invalid_state("reset the game", self.phase));
        };

        let previous = session.id.clone();
        session.restart();
        tracing::info!("Session {} reset as {}", previous, session.id);

        self.persistence.clear_active();
        self.winner = None;
        self.phase = GamePhase::InProgress;
        Ok(())
    }

    /// Queues a save of the current session without changing it.
    pub fn checkpoint(&self) {
        if self.phase == GamePhase::InProgress {
            if let Some(session) = &self.session {
                self.persistence.save_active(session.clone());
            }
        }
    }

    pub fn view_model(&self) -> GameView {
        GameView::build(self.phase, self.session.as_ref(), self.winner.as_ref())
    }

    /// Completed games, most recent first. Unreadable storage yields an
    /// empty list.
    pub async fn history(&self) -> Vec<HistoryEntry> {
        self.persistence.flush().await;
        match self.store.load_history().await {
            Ok(history) => history,
            Err(e) => {
                tracing::warn!("Failed to load history: {}", e);
                Vec::new()
            }
        }
    }

    /// Deletes the history log.
    pub async fn clear_history(&self) -> Result<()> {
        self.persistence.flush().await;
        self.store.clear_history().await
    }

    /// Waits for all queued writes to reach the store.
    pub async fn flush(&self) {
        self.persistence.flush().await;
    }

    fn active_session_mut(&mut self, operation: &str) -> Result<&mut GameSession> {
        if self.phase != GamePhase::InProgress {
            return Err(DominoError::invalid_state(operation, self.phase));
        }
        self.session
            .as_mut()
            .ok_or_else(|| DominoError::invalid_state(operation, self.phase))
    }

    /// Archives a save that already has a winner.
    ///
    /// Happens when the process stopped after the winning write but before the
    /// active slot was cleared. History is only appended when it does not
    /// already hold this session.
    async fn archive_stale(&self, saved: &GameSession, winner: &Participant) {
        tracing::warn!(
            "Saved session {} already won by {}; archiving",
            saved.id,
            winner.name
        );
        let recorded = self
            .history()
            .await
            .iter()
            .any(|entry| entry.session_id == saved.id);
        if !recorded {
            self.persistence
                .append_history(HistoryEntry::completed(saved, winner.name.clone()));
        }
        self.persistence.clear_active();
    }
}
