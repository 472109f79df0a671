//! Application layer for the domino scorer.
//!
//! Sits between the domain crate and any presentation surface. The
//! [`GameController`] is the only entry point a front end needs.

pub mod game_controller;
pub mod persistence;
pub mod view_model;

pub use game_controller::{DeleteOutcome, GameController, ScoreOutcome, SessionStart};
pub use persistence::PersistenceQueue;
pub use view_model::{GameView, ParticipantView};
