//! Read-only projection of the game for presentation code.

use domino_core::{GameMode, GamePhase, GameSession, Participant};
use serde::Serialize;

/// One participant's standing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantView {
    pub index: usize,
    pub name: String,
    pub total: u64,
    pub scores: Vec<u32>,
    pub is_leader: bool,
}

/// Everything a screen needs to render the current game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameView {
    pub phase: GamePhase,
    pub mode: Option<GameMode>,
    pub target_score: Option<u32>,
    pub participants: Vec<ParticipantView>,
    /// Index of the participant strictly ahead of everyone else
    pub leader: Option<usize>,
    pub is_over: bool,
    pub winner: Option<String>,
}

impl GameView {
    pub(crate) fn build(
        phase: GamePhase,
        session: Option<&GameSession>,
        winner: Option<&Participant>,
    ) -> Self {
        let Some(session) = session else {
            return Self {
                phase,
                mode: None,
                target_score: None,
                participants: Vec::new(),
                leader: None,
                is_over: false,
                winner: None,
            };
        };

        let leader = session.ledger.leader();
        let participants = session
            .configuration
            .participants
            .iter()
            .zip(session.ledger.all_scores())
            .map(|(participant, scores)| ParticipantView {
                index: participant.index,
                name: participant.name.clone(),
                total: scores.iter().map(|&s| u64::from(s)).sum(),
                scores: scores.clone(),
                is_leader: leader == Some(participant.index),
            })
            .collect();

        Self {
            phase,
            mode: Some(session.configuration.mode),
            target_score: Some(session.configuration.target_score),
            participants,
            leader,
            is_over: phase == GamePhase::Complete,
            winner: winner.map(|w| w.name.clone()),
        }
    }

    pub fn leader_name(&self) -> Option<&str> {
        self.leader
            .and_then(|index| self.participants.get(index))
            .map(|p| p.name.as_str())
    }

    pub fn total(&self, index: usize) -> Option<u64> {
        self.participants.get(index).map(|p| p.total)
    }
}
