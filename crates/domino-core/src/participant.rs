//! Participants and the registry that resolves them from setup input.

use crate::error::{DominoError, Result};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Number of participants in a team game.
pub const TEAM_COUNT: usize = 2;

/// Minimum number of participants in a free-for-all game.
pub const MIN_PLAYERS: usize = 3;

/// Default upper bound on free-for-all participants.
pub const DEFAULT_MAX_PLAYERS: usize = 8;

/// How participants are grouped in a game.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum GameMode {
    /// Two fixed teams.
    Teams,
    /// Three or more individual players.
    Players,
}

impl GameMode {
    /// Label used when a participant name is left blank.
    fn default_label(self) -> &'static str {
        match self {
            GameMode::Teams => "Team",
            GameMode::Players => "Player",
        }
    }
}

/// A team or individual player tracked in a session.
///
/// `index` is the participant's fixed position. It orders the display and
/// breaks ties when standings are computed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub index: usize,
    pub name: String,
}

impl Participant {
    pub fn new(index: usize, name: impl Into<String>) -> Self {
        Self {
            index,
            name: name.into(),
        }
    }
}

/// Resolves raw setup input into the ordered participant list of a session.
#[derive(Debug, Clone)]
pub struct ParticipantRegistry {
    max_players: usize,
}

impl Default for ParticipantRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_PLAYERS)
    }
}

impl ParticipantRegistry {
    /// Creates a registry accepting at most `max_players` in free-for-all mode.
    ///
    /// Values below the free-for-all minimum are raised to it.
    pub fn new(max_players: usize) -> Self {
        Self {
            max_players: max_players.max(MIN_PLAYERS),
        }
    }

    pub fn max_players(&self) -> usize {
        self.max_players
    }

    /// Resolves participant names for `mode`.
    ///
    /// Names are trimmed and blank names become `Team N` or `Player N`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidSetup` when the count is wrong for the mode or two
    /// names collide (case-insensitive).
    pub fn resolve<S: AsRef<str>>(&self, mode: GameMode, names: &[S]) -> Result<Vec<Participant>> {
        let count = names.len();
        match mode {
            GameMode::Teams if count != TEAM_COUNT => {
                return Err(DominoError::invalid_setup(format!(
                    "team games need exactly {} teams, got {}",
                    TEAM_COUNT, count
                )));
            }
            GameMode::Players if !(MIN_PLAYERS..=self.max_players).contains(&count) => {
                return Err(DominoError::invalid_setup(format!(
                    "player games need {} to {} players, got {}",
                    MIN_PLAYERS, self.max_players, count
                )));
            }
            _ => {}
        }

        let participants: Vec<Participant> = names
            .iter()
            .enumerate()
            .map(|(index, raw)| {
                let trimmed = raw.as_ref().trim();
                let name = if trimmed.is_empty() {
                    format!("{} {}", mode.default_label(), index + 1)
                } else {
                    trimmed.to_string()
                };
                Participant::new(index, name)
            })
            .collect();

        for (i, participant) in participants.iter().enumerate() {
            let lower = participant.name.to_lowercase();
            if participants[..i]
                .iter()
                .any(|earlier| earlier.name.to_lowercase() == lower)
            {
                return Err(DominoError::invalid_setup(format!(
                    "duplicate participant name '{}'",
                    participant.name
                )));
            }
        }

        Ok(participants)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_teams_trims_names() {
        let registry = ParticipantRegistry::default();
        let participants = registry
            .resolve(GameMode::Teams, &["  Team A ", "Team B"])
            .unwrap();

        assert_eq!(participants.len(), 2);
        assert_eq!(participants[0], Participant::new(0, "Team A"));
        assert_eq!(participants[1], Participant::new(1, "Team B"));
    }

    #[test]
    fn test_blank_names_get_defaults() {
        let registry = ParticipantRegistry::default();
        let participants = registry
            .resolve(GameMode::Players, &["Ana", "", "   "])
            .unwrap();

        assert_eq!(participants[1].name, "Player 2");
        assert_eq!(participants[2].name, "Player 3");
    }

    #[test]
    fn test_team_count_enforced() {
        let registry = ParticipantRegistry::default();
        let err = registry
            .resolve(GameMode::Teams, &["A", "B", "C"])
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_player_bounds_enforced() {
        let registry = ParticipantRegistry::new(4);
        assert!(registry.resolve(GameMode::Players, &["A", "B"]).is_err());
        assert!(registry
            .resolve(GameMode::Players, &["A", "B", "C", "D", "E"])
            .is_err());
        assert!(registry.resolve(GameMode::Players, &["A", "B", "C", "D"]).is_ok());
    }

    #[test]
    fn test_max_players_floor() {
        assert_eq!(ParticipantRegistry::new(1).max_players(), MIN_PLAYERS);
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let registry = ParticipantRegistry::default();
        let err = registry
            .resolve(GameMode::Players, &["Ana", "ana", "Luis"])
            .unwrap_err();
        assert!(matches!(err, DominoError::InvalidSetup(_)));
    }

    #[test]
    fn test_default_name_collision_rejected() {
        let registry = ParticipantRegistry::default();
        assert!(registry.resolve(GameMode::Teams, &["Team 2", ""]).is_err());
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("teams".parse::<GameMode>().unwrap(), GameMode::Teams);
        assert_eq!("Players".parse::<GameMode>().unwrap(), GameMode::Players);
        assert_eq!(GameMode::Teams.to_string(), "teams");
    }
}
