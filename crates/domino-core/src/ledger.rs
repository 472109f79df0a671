//! Per-participant round score ledger.

use crate::error::{DominoError, Result};
use serde::{Deserialize, Serialize};

/// Ordered round scores for every participant.
///
/// Sequence `i` belongs to the participant with index `i`. Entries are kept in
/// the order they were recorded; a participant's total is always the sum of
/// its sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreLedger {
    scores: Vec<Vec<u32>>,
}

impl ScoreLedger {
    /// Creates a ledger with a single zero entry per participant.
    pub fn seeded(participant_count: usize) -> Self {
        Self {
            scores: vec![vec![0]; participant_count],
        }
    }

    /// Rebuilds a ledger from previously recorded sequences.
    pub fn from_scores(scores: Vec<Vec<u32>>) -> Self {
        Self { scores }
    }

    pub fn participant_count(&self) -> usize {
        self.scores.len()
    }

    /// Appends a round score and returns the participant's new total.
    ///
    /// # Errors
    ///
    /// - `InvalidAmount` if `amount` is zero
    /// - `ParticipantOutOfRange` if the participant does not exist
    pub fn add_score(&mut self, participant: usize, amount: u32) -> Result<u64> {
        if amount == 0 {
            return Err(DominoError::invalid_amount("0"));
        }
        self.sequence_mut(participant)?.push(amount);
        self.total(participant)
    }

    /// Removes the entry at `score_index` and returns its value.
    ///
    /// Later entries shift down by one. An index that no longer exists fails
    /// instead of removing a neighbouring entry.
    pub fn delete_score(&mut self, participant: usize, score_index: usize) -> Result<u32> {
        let sequence = self.sequence_mut(participant)?;
        if score_index >= sequence.len() {
            return Err(DominoError::ScoreOutOfRange {
                participant,
                index: score_index,
                len: sequence.len(),
            });
        }
        Ok(sequence.remove(score_index))
    }

    pub fn total(&self, participant: usize) -> Result<u64> {
        Ok(self.scores(participant)?.iter().map(|&s| u64::from(s)).sum())
    }

    /// Totals for every participant, in index order.
    pub fn totals(&self) -> Vec<u64> {
        self.scores
            .iter()
            .map(|sequence| sequence.iter().map(|&s| u64::from(s)).sum())
            .collect()
    }

    /// Index of the participant with the strictly highest total.
    ///
    /// A tie for the highest total, or an empty ledger, has no leader.
    pub fn leader(&self) -> Option<usize> {
        let totals = self.totals();
        let best = *totals.iter().max()?;
        let mut leaders = totals
            .iter()
            .enumerate()
            .filter(|&(_, &total)| total == best)
            .map(|(index, _)| index);
        match (leaders.next(), leaders.next()) {
            (Some(index), None) => Some(index),
            _ => None,
        }
    }

    /// Recorded sequence for one participant.
    pub fn scores(&self, participant: usize) -> Result<&[u32]> {
        self.scores
            .get(participant)
            .map(Vec::as_slice)
            .ok_or(DominoError::ParticipantOutOfRange {
                index: participant,
                count: self.scores.len(),
            })
    }

    /// All sequences, in index order.
    pub fn all_scores(&self) -> &[Vec<u32>] {
        &self.scores
    }

    /// Resets every sequence to a single zero entry.
    pub fn reseed(&mut self) {
        for sequence in &mut self.scores {
            sequence.clear();
            sequence.push(0);
        }
    }

    fn sequence_mut(&mut self, participant: usize) -> Result<&mut Vec<u32>> {
        let count = self.scores.len();
        self.scores
            .get_mut(participant)
            .ok_or(DominoError::ParticipantOutOfRange {
                index: participant,
                count,
            })
    }
}
