//! Error types for the scheduling engine.

use almanac_core::error::AlmanacError;

/// Validation failures for a candidate event.
///
/// Recoverable: shown inline next to the form, blocks the save.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Title is required")]
    EmptyTitle,
    #[error("Start and end times are required")]
    MissingTimes,
    #[error("End time must be greater than start time")]
    InvalidRange,
    #[error("Start time for today must be at least current time + 1 hour")]
    TooSoon,
}

/// Errors from the identity provider.
///
/// Surfaced as a generic user-facing message; never touches event state.
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("An account with this email already exists")]
    AccountExists,
    #[error("Sign-in failed: {0}")]
    Provider(String),
}

/// Errors from agenda mutations.
#[derive(Debug, thiserror::Error)]
pub enum AgendaError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Storage(#[from] AlmanacError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_messages() {
        assert_eq!(ValidationError::EmptyTitle.to_string(), "Title is required");
        assert_eq!(
            ValidationError::MissingTimes.to_string(),
            "Start and end times are required"
        );
        assert_eq!(
            ValidationError::InvalidRange.to_string(),
            "End time must be greater than start time"
        );
        assert_eq!(
            ValidationError::TooSoon.to_string(),
            "Start time for today must be at least current time + 1 hour"
        );
    }

    #[test]
    fn test_identity_error_messages() {
        assert_eq!(
            IdentityError::InvalidCredentials.to_string(),
            "Invalid email or password"
        );
        assert_eq!(
            IdentityError::Provider("network unreachable".to_string()).to_string(),
            "Sign-in failed: network unreachable"
        );
    }

    #[test]
    fn test_agenda_error_from_validation() {
        let err: AgendaError = ValidationError::TooSoon.into();
        assert!(matches!(err, AgendaError::Validation(ValidationError::TooSoon)));
        // Transparent: the inner message is the whole message.
        assert_eq!(
            err.to_string(),
            "Start time for today must be at least current time + 1 hour"
        );
    }

    #[test]
    fn test_agenda_error_from_storage() {
        let err: AgendaError = AlmanacError::Storage("slot gone".to_string()).into();
        assert!(matches!(err, AgendaError::Storage(_)));
        assert!(err.to_string().contains("slot gone"));
    }
}
