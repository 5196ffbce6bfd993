//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Proposal cannot be empty")]
    EmptyProposal,

    #[error("Duplicate participant name: {0}")]
    DuplicateParticipant(String),

    #[error("Invalid participant name '{name}': {reason}")]
    InvalidParticipantName { name: String, reason: String },

    #[error("Invalid weight {weight} for participant '{name}'")]
    InvalidWeight { name: String, weight: f64 },

    #[error(
        "Expert '{expert}' weighs {weight}, which is not below the coordinator's {coordinator_weight}"
    )]
    CoordinatorNotDominant {
        expert: String,
        weight: f64,
        coordinator_weight: f64,
    },

    #[error("Participant '{0}' has the wrong role for its roster slot")]
    RoleMismatch(String),

    #[error("Invalid deliberation policy: {0}")]
    InvalidPolicy(String),

    #[error("Operation cancelled")]
    Cancelled,
}

impl DomainError {
    /// Check if this error represents a cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, DomainError::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancelled_error_display() {
        let error = DomainError::Cancelled;
        assert_eq!(error.to_string(), "Operation cancelled");
    }

    #[test]
    fn test_is_cancelled_check() {
        assert!(DomainError::Cancelled.is_cancelled());
        assert!(!DomainError::EmptyProposal.is_cancelled());
        assert!(!DomainError::DuplicateParticipant("economist".to_string()).is_cancelled());
    }

    #[test]
    fn test_invalid_weight_display() {
        let error = DomainError::InvalidWeight {
            name: "economist".to_string(),
            weight: -0.5,
        };
        assert_eq!(
            error.to_string(),
            "Invalid weight -0.5 for participant 'economist'"
        );
    }
}
