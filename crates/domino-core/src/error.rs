//! Error types for the domino scoring engine.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the entire engine.
///
/// Validation variants are the only ones a presentation layer ever sees as a
/// rejected action. Persistence and mismatch variants stay inside the engine
/// and are logged.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DominoError {
    /// Score amount is not a positive integer
    #[error("Invalid score amount: {0}")]
    InvalidAmount(String),

    /// Participant index does not exist in this session
    #[error("Participant {index} out of range ({count} participants)")]
    ParticipantOutOfRange { index: usize, count: usize },

    /// Score position does not exist in the participant's sequence
    #[error("Score {index} out of range for participant {participant} ({len} entries)")]
    ScoreOutOfRange {
        participant: usize,
        index: usize,
        len: usize,
    },

    /// Setup input cannot form a valid game configuration
    #[error("Invalid setup: {0}")]
    InvalidSetup(String),

    /// Operation is not allowed in the controller's current phase
    #[error("Cannot {operation} while game is {phase}")]
    InvalidState { operation: String, phase: String },

    /// Storage read/write failure
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Saved session does not belong to the requested configuration
    #[error("Configuration mismatch: {0}")]
    ConfigurationMismatch(String),

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },

    /// Stored record has a schema version no migration path covers
    #[error("Migration error: {0}")]
    Migration(String),
}

impl DominoError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates an InvalidAmount error
    pub fn invalid_amount(message: impl Into<String>) -> Self {
        Self::InvalidAmount(message.into())
    }

    /// Creates an InvalidSetup error
    pub fn invalid_setup(message: impl Into<String>) -> Self {
        Self::InvalidSetup(message.into())
    }

    /// Creates an InvalidState error
    pub fn invalid_state(operation: impl Into<String>, phase: impl ToString) -> Self {
        Self::InvalidState {
            operation: operation.into(),
            phase: phase.to_string(),
        }
    }

    /// Creates a Persistence error
    pub fn persistence(message: impl Into<String>) -> Self {
        Self::Persistence(message.into())
    }

    /// Creates a ConfigurationMismatch error
    pub fn mismatch(message: impl Into<String>) -> Self {
        Self::ConfigurationMismatch(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this error rejects a user action.
    ///
    /// Returns true for bad amounts, bad indices, bad setup input and
    /// operations attempted in the wrong phase.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidAmount(_)
                | Self::ParticipantOutOfRange { .. }
                | Self::ScoreOutOfRange { .. }
                | Self::InvalidSetup(_)
                | Self::InvalidState { .. }
        )
    }

    /// Check if this error came from the storage layer
    pub fn is_persistence(&self) -> bool {
        matches!(
            self,
            Self::Persistence(_)
                | Self::Io { .. }
                | Self::Serialization { .. }
                | Self::Migration(_)
        )
    }

    /// Check if this is a configuration mismatch
    pub fn is_mismatch(&self) -> bool {
        matches!(self, Self::ConfigurationMismatch(_))
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for DominoError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for DominoError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for DominoError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for DominoError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<version_migrate::MigrationError> for DominoError {
    fn from(err: version_migrate::MigrationError) -> Self {
        use version_migrate::MigrationError;

        match err {
            MigrationError::DeserializationError(_) | MigrationError::SerializationError(_) => {
                Self::Serialization {
                    format: "migration".to_string(),
                    message: err.to_string(),
                }
            }
            MigrationError::IoError { .. } => Self::Io {
                message: err.to_string(),
            },
            _ => Self::Migration(err.to_string()),
        }
    }
}

/// A type alias for `Result<T, DominoError>`.
pub type Result<T> = std::result::Result<T, DominoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_classification() {
        assert!(DominoError::invalid_amount("-5").is_validation());
        assert!(DominoError::ParticipantOutOfRange { index: 4, count: 2 }.is_validation());
        assert!(DominoError::invalid_state("submit a score", "complete").is_validation());
        assert!(!DominoError::persistence("disk full").is_validation());
        assert!(!DominoError::mismatch("target differs").is_validation());
    }

    #[test]
    fn test_io_error_is_persistence() {
        let err: DominoError =
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied").into();
        assert!(err.is_persistence());
        assert!(err.to_string().contains("PermissionDenied"));
    }

    #[test]
    fn test_migration_is_persistence() {
        let err = DominoError::Migration("no path for version 9.0.0".to_string());
        assert!(err.is_persistence());
        assert!(!err.is_validation());
    }

    #[test]
    fn test_display_messages() {
        let err = DominoError::ScoreOutOfRange {
            participant: 1,
            index: 3,
            len: 2,
        };
        assert_eq!(
            err.to_string(),
            "Score 3 out of range for participant 1 (2 entries)"
        );
    }
}
