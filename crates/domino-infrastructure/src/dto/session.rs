//! Session and history DTOs and migrations

use serde::{Deserialize, Serialize};
use version_migrate::{FromDomain, IntoDomain, Versioned};

use super::flat_json_to_toml;
use domino_core::DominoError;
use domino_core::error::Result;
use domino_core::{GameConfiguration, GameMode, GameSession, HistoryEntry, Participant, ScoreLedger};

/// Migrator entity name of the active-session record.
pub const ACTIVE_SESSION_ENTITY: &str = "active_session";

/// Migrator entity name of one history entry.
pub const HISTORY_ENTRY_ENTITY: &str = "history_entry";

/// Rebuilds a configuration from the flat persisted fields.
///
/// The result is checked with `GameConfiguration::ensure_consistent` once the
/// migrator hands it back.
fn configuration_from_parts(
    mode: GameMode,
    target_score: u32,
    names: Vec<String>,
) -> GameConfiguration {
    GameConfiguration {
        mode,
        target_score,
        participants: names
            .into_iter()
            .enumerate()
            .map(|(index, name)| Participant::new(index, name))
            .collect(),
    }
}

// ============================================================================
// Active session
// ============================================================================

/// Active session V1.0.0 (initial version).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Versioned)]
#[versioned(version = "1.0.0")]
pub struct ActiveSessionV1_0_0 {
    pub id: String,
    pub mode: GameMode,
    pub target_score: u32,
    /// Participant names in index order.
    pub participants: Vec<String>,
    /// One score sequence per participant, in index order.
    pub scores: Vec<Vec<u32>>,
    pub created_at: String,
    pub updated_at: String,
}

impl IntoDomain<GameSession> for ActiveSessionV1_0_0 {
    fn into_domain(self) -> GameSession {
        GameSession {
            id: self.id,
            configuration: configuration_from_parts(self.mode, self.target_score, self.participants),
            ledger: ScoreLedger::from_scores(self.scores),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl FromDomain<GameSession> for ActiveSessionV1_0_0 {
    fn from_domain(session: GameSession) -> Self {
        ActiveSessionV1_0_0 {
            mode: session.configuration.mode,
            target_score: session.configuration.target_score,
            participants: session.configuration.names(),
            scores: session.ledger.all_scores().to_vec(),
            id: session.id,
            created_at: session.created_at,
            updated_at: session.updated_at,
        }
    }
}

// ============================================================================
// History
// ============================================================================

/// History entry V1.0.0 (initial version).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Versioned)]
#[versioned(version = "1.0.0")]
pub struct HistoryEntryV1_0_0 {
    pub session_id: String,
    pub timestamp: String,
    pub mode: GameMode,
    pub target_score: u32,
    pub participants: Vec<String>,
    pub scores: Vec<Vec<u32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner: Option<String>,
}

impl IntoDomain<HistoryEntry> for HistoryEntryV1_0_0 {
    fn into_domain(self) -> HistoryEntry {
        HistoryEntry {
            session_id: self.session_id,
            timestamp: self.timestamp,
            configuration: configuration_from_parts(self.mode, self.target_score, self.participants),
            final_ledger: ScoreLedger::from_scores(self.scores),
            winner: self.winner,
        }
    }
}

impl FromDomain<HistoryEntry> for HistoryEntryV1_0_0 {
    fn from_domain(entry: HistoryEntry) -> Self {
        HistoryEntryV1_0_0 {
            mode: entry.configuration.mode,
            target_score: entry.configuration.target_score,
            participants: entry.configuration.names(),
            scores: entry.final_ledger.all_scores().to_vec(),
            session_id: entry.session_id,
            timestamp: entry.timestamp,
            winner: entry.winner,
        }
    }
}

/// The history file: versioned entries, most recent first.
///
/// Entries stay raw TOML here so each one is migrated on its own and a single
/// unreadable entry does not hide the rest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryLogDocument {
    #[serde(default)]
    pub entries: Vec<toml::Value>,
}

impl HistoryLogDocument {
    /// Migrates every entry, skipping the ones no migration path accepts.
    pub fn into_domain(self) -> Result<Vec<HistoryEntry>> {
        let migrator = create_history_entry_migrator()?;
        let entries = self
            .entries
            .into_iter()
            .filter_map(|value| {
                let loaded: Result<HistoryEntry> = migrator
                    .load_flat_from(HISTORY_ENTRY_ENTITY, value)
                    .map_err(DominoError::from)
                    .and_then(|entry: HistoryEntry| {
                        entry.configuration.ensure_consistent(&entry.final_ledger)?;
                        Ok(entry)
                    });
                match loaded {
                    Ok(entry) => Some(entry),
                    Err(e) => {
                        tracing::warn!("Skipping unreadable history entry: {}", e);
                        None
                    }
                }
            })
            .collect();
        Ok(entries)
    }
}

// ============================================================================
// Migrator factories
// ============================================================================

/// Creates the Migrator for active-session records.
///
/// # Migration Path
///
/// - V1.0.0 → GameSession
pub fn create_active_session_migrator() -> Result<version_migrate::Migrator> {
    let mut migrator = version_migrate::Migrator::builder().build();

    let active_path = version_migrate::Migrator::define(ACTIVE_SESSION_ENTITY)
        .from::<ActiveSessionV1_0_0>()
        .into_with_save::<GameSession>();

    migrator.register(active_path)?;
    Ok(migrator)
}

/// Creates the Migrator for history entries.
///
/// # Migration Path
///
/// - V1.0.0 → HistoryEntry
pub fn create_history_entry_migrator() -> Result<version_migrate::Migrator> {
    let mut migrator = version_migrate::Migrator::builder().build();

    let history_path = version_migrate::Migrator::define(HISTORY_ENTRY_ENTITY)
        .from::<HistoryEntryV1_0_0>()
        .into_with_save::<HistoryEntry>();

    migrator.register(history_path)?;
    Ok(migrator)
}

/// Migrates a stored active-session document into a checked `GameSession`.
pub fn load_active_session(value: toml::Value) -> Result<GameSession> {
    let migrator = create_active_session_migrator()?;
    let session: GameSession = migrator.load_flat_from(ACTIVE_SESSION_ENTITY, value)?;
    session.configuration.ensure_consistent(&session.ledger)?;
    Ok(session)
}

/// Renders `session` as the latest active-session schema.
pub fn store_active_session(session: &GameSession) -> Result<toml::Value> {
    let migrator = create_active_session_migrator()?;
    let json_str = migrator.save_domain_flat(ACTIVE_SESSION_ENTITY, session)?;
    flat_json_to_toml(&json_str)
}

/// Renders `entry` as the latest history-entry schema.
pub fn store_history_entry(entry: &HistoryEntry) -> Result<toml::Value> {
    let migrator = create_history_entry_migrator()?;
    let json_str = migrator.save_domain_flat(HISTORY_ENTRY_ENTITY, entry)?;
    flat_json_to_toml(&json_str)
}
