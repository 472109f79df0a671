//! Session domain module.
//!
//! # Module Structure
//!
//! - `model`: configuration, live session and controller phase
//! - `history`: completed game snapshots (`HistoryEntry`)
//! - `store`: persistence trait (`SessionStore`)

mod history;
mod model;
mod store;

pub use history::HistoryEntry;
pub use model::{DEFAULT_TARGET_SCORE, GameConfiguration, GamePhase, GameSession};
pub use store::{SessionStore, resumable};
