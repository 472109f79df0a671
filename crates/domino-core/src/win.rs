//! Win detection.

use crate::ledger::ScoreLedger;
use crate::participant::Participant;
use serde::{Deserialize, Serialize};

/// Result of a win check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WinOutcome {
    pub is_over: bool,
    pub winner: Option<Participant>,
}

impl WinOutcome {
    pub fn ongoing() -> Self {
        Self {
            is_over: false,
            winner: None,
        }
    }

    pub fn won_by(participant: Participant) -> Self {
        Self {
            is_over: true,
            winner: Some(participant),
        }
    }
}

/// Decides whether a target score has been reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WinEvaluator {
    target_score: u32,
}

impl WinEvaluator {
    pub fn new(target_score: u32) -> Self {
        Self { target_score }
    }

    /// Evaluates the ledger right after `scorer` added a round score.
    ///
    /// Only the scorer's total changed, so the scorer is the only participant
    /// that can have just crossed the target.
    pub fn after_score(
        &self,
        ledger: &ScoreLedger,
        participants: &[Participant],
        scorer: usize,
    ) -> WinOutcome {
        let reached = ledger
            .total(scorer)
            .map(|total| total >= u64::from(self.target_score))
            .unwrap_or(false);

        match participants.get(scorer) {
            Some(participant) if reached => WinOutcome::won_by(participant.clone()),
            _ => WinOutcome::ongoing(),
        }
    }

    /// Scans every participant in index order and reports the first one at
    /// or above the target.
    pub fn evaluate_ledger(&self, ledger: &ScoreLedger, participants: &[Participant]) -> WinOutcome {
        ledger
            .totals()
            .iter()
            .position(|&total| total >= u64::from(self.target_score))
            .and_then(|index| participants.get(index))
            .map(|participant| WinOutcome::won_by(participant.clone()))
            .unwrap_or_else(WinOutcome::ongoing)
    }
}
