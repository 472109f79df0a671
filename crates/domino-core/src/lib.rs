//! Domain layer of the domino score tracker.
//!
//! Holds the participant registry, the score ledger, win detection and the
//! session store contract. Nothing here performs I/O.

pub mod config;
pub mod error;
pub mod ledger;
pub mod participant;
pub mod session;
pub mod win;

pub use config::AppConfig;
pub use error::DominoError;
pub use ledger::ScoreLedger;
pub use participant::{GameMode, Participant, ParticipantRegistry};
pub use session::{GameConfiguration, GamePhase, GameSession, HistoryEntry, SessionStore};
pub use win::{WinEvaluator, WinOutcome};
