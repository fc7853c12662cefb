//! Error types for the giftdraw engine.
//!
//! All errors use the `GD_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Exchange errors
//! - 2xx: Participant errors
//! - 3xx: Draw errors
//! - 4xx: Assignment / lookup errors
//! - 9xx: General / internal errors
//!
//! Adapters that need a coarse classification (HTTP status, RPC code)
//! should match on [`GiftdrawError::kind`] rather than on variants.

use std::fmt;

use thiserror::Error;

use crate::{ExchangeId, ParticipantId};

/// Central error enum for all giftdraw operations.
#[derive(Debug, Error)]
pub enum GiftdrawError {
    // =================================================================
    // Exchange Errors (1xx)
    // =================================================================
    /// No exchange with this id is owned by the caller.
    #[error("GD_ERR_100: Exchange not found: {0}")]
    ExchangeNotFound(ExchangeId),

    /// The exchange is locked; its data is immutable until unlocked.
    #[error("GD_ERR_101: Exchange is locked: {0}")]
    ExchangeLocked(ExchangeId),

    /// Locking requires a completed draw.
    #[error("GD_ERR_102: Cannot lock exchange without performing a draw")]
    NoDrawPerformed,

    /// A locked exchange with assignments must be unlocked before deletion.
    #[error("GD_ERR_103: Cannot delete locked exchange with assignments; unlock first")]
    LockedWithAssignments,

    /// The caller does not own the exchange the target entity belongs to.
    #[error("GD_ERR_104: Caller does not own this exchange")]
    NotOwner,

    // =================================================================
    // Participant Errors (2xx)
    // =================================================================
    /// The requested participant does not exist.
    #[error("GD_ERR_200: Participant not found: {0}")]
    ParticipantNotFound(ParticipantId),

    /// Another participant in the same exchange already uses this contact.
    #[error("GD_ERR_201: Contact already exists in this exchange: {contact}")]
    DuplicateContact { contact: String },

    // =================================================================
    // Draw Errors (3xx)
    // =================================================================
    /// A draw already exists and redraw was not requested.
    #[error("GD_ERR_300: Draw already exists for this exchange; set allow_redraw to redraw")]
    AlreadyDrawn,

    /// Too few participants to run a draw.
    #[error("GD_ERR_301: Minimum {required} participants required, current count: {actual}")]
    InsufficientParticipants { required: usize, actual: usize },

    /// Every shuffle attempt produced a self-assignment. Retryable.
    #[error("GD_ERR_302: Failed to generate a valid draw after {attempts} attempts; please try again")]
    DrawExhausted { attempts: u32 },

    /// A generated pairing failed verification before persistence.
    #[error("GD_ERR_303: Invalid derangement: {reason}")]
    InvalidDerangement { reason: String },

    /// An assignment would make a participant give to themselves.
    #[error("GD_ERR_304: Participant cannot be assigned to themselves: {0}")]
    SelfAssignment(ParticipantId),

    /// Two assignments in one exchange share a giver.
    #[error("GD_ERR_305: Participant already has an assignment as giver: {0}")]
    DuplicateGiver(ParticipantId),

    // =================================================================
    // Assignment / Lookup Errors (4xx)
    // =================================================================
    /// No assignment for this token; the draw may not have run yet.
    #[error("GD_ERR_400: No assignment found for this access token; draw may not have been performed yet")]
    AssignmentNotFound,

    /// The presented token is not well-formed.
    #[error("GD_ERR_401: Invalid access token format")]
    InvalidAccessToken,

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Input failed validation (blank name, negative budget, ...).
    #[error("GD_ERR_900: Invalid input: {reason}")]
    InvalidInput { reason: String },

    /// Configuration error (invalid config file, out-of-range values).
    #[error("GD_ERR_901: Configuration error: {0}")]
    Configuration(String),

    /// Unrecoverable internal error (e.g. a poisoned lock).
    #[error("GD_ERR_902: Internal error: {0}")]
    Internal(String),
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, GiftdrawError>;

/// Coarse error classification for transport adapters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Entity or assignment absent.
    NotFound,
    /// Lifecycle, count, or lock precondition violated.
    InvalidState,
    /// Uniqueness violated.
    Conflict,
    /// Caller does not own the exchange.
    Unauthorized,
    /// Malformed input.
    Validation,
    /// Anything else.
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::InvalidState => write!(f, "INVALID_STATE"),
            Self::Conflict => write!(f, "CONFLICT"),
            Self::Unauthorized => write!(f, "UNAUTHORIZED"),
            Self::Validation => write!(f, "VALIDATION"),
            Self::Internal => write!(f, "INTERNAL"),
        }
    }
}

impl GiftdrawError {
    /// Classify this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ExchangeNotFound(_) | Self::ParticipantNotFound(_) | Self::AssignmentNotFound => {
                ErrorKind::NotFound
            }
            Self::ExchangeLocked(_)
            | Self::NoDrawPerformed
            | Self::LockedWithAssignments
            | Self::AlreadyDrawn
            | Self::InsufficientParticipants { .. }
            | Self::DrawExhausted { .. }
            | Self::InvalidDerangement { .. }
            | Self::SelfAssignment(_) => ErrorKind::InvalidState,
            Self::DuplicateContact { .. } | Self::DuplicateGiver(_) => ErrorKind::Conflict,
            Self::NotOwner => ErrorKind::Unauthorized,
            Self::InvalidAccessToken | Self::InvalidInput { .. } => ErrorKind::Validation,
            Self::Configuration(_) | Self::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Whether simply repeating the same call may succeed.
    ///
    /// Only draw exhaustion qualifies: each attempt reshuffles independently.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::DrawExhausted { .. })
    }

    /// Shorthand for [`GiftdrawError::InvalidInput`].
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for GiftdrawError {
    fn from(err: serde_json::Error) -> Self {
        Self::Configuration(err.to_string())
    }
}

impl From<uuid::Error> for GiftdrawError {
    fn from(_: uuid::Error) -> Self {
        Self::InvalidAccessToken
    }
}

impl<T> From<std::sync::PoisonError<T>> for GiftdrawError {
    fn from(err: std::sync::PoisonError<T>) -> Self {
        Self::Internal(format!("lock poisoned: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_contains_prefix() {
        let err = GiftdrawError::ExchangeNotFound(ExchangeId::new());
        let msg = format!("{err}");
        assert!(msg.starts_with("GD_ERR_100"), "Got: {msg}");
    }

    #[test]
    fn insufficient_participants_display() {
        let err = GiftdrawError::InsufficientParticipants {
            required: 3,
            actual: 2,
        };
        let msg = format!("{err}");
        assert!(msg.contains("GD_ERR_301"));
        assert!(msg.contains("Minimum 3"));
        assert!(msg.contains("current count: 2"));
    }

    #[test]
    fn draw_exhausted_is_retryable_invalid_state() {
        let err = GiftdrawError::DrawExhausted { attempts: 100 };
        assert!(err.is_retryable());
        assert_eq!(err.kind(), ErrorKind::InvalidState);
        assert!(format!("{err}").contains("100 attempts"));

        assert!(!GiftdrawError::AlreadyDrawn.is_retryable());
    }

    #[test]
    fn kinds_are_distinguishable() {
        assert_eq!(GiftdrawError::AssignmentNotFound.kind(), ErrorKind::NotFound);
        assert_eq!(
            GiftdrawError::ExchangeLocked(ExchangeId::new()).kind(),
            ErrorKind::InvalidState
        );
        assert_eq!(
            GiftdrawError::DuplicateContact {
                contact: "a@example.com".into()
            }
            .kind(),
            ErrorKind::Conflict
        );
        assert_eq!(GiftdrawError::NotOwner.kind(), ErrorKind::Unauthorized);
        assert_eq!(GiftdrawError::InvalidAccessToken.kind(), ErrorKind::Validation);
        assert_eq!(ErrorKind::InvalidState.to_string(), "INVALID_STATE");
    }

    #[test]
    fn poison_error_maps_to_internal() {
        let lock = std::sync::Mutex::new(());
        let _ = std::thread::scope(|s| {
            s.spawn(|| {
                let _guard = lock.lock().unwrap();
                panic!("poison");
            })
            .join()
        });
        let err: GiftdrawError = lock.lock().unwrap_err().into();
        assert!(matches!(err, GiftdrawError::Internal(_)));
    }

    #[test]
    fn all_errors_have_gd_err_prefix() {
        let errors: Vec<Box<dyn std::error::Error>> = vec![
            Box::new(GiftdrawError::NoDrawPerformed),
            Box::new(GiftdrawError::LockedWithAssignments),
            Box::new(GiftdrawError::AlreadyDrawn),
            Box::new(GiftdrawError::InvalidAccessToken),
            Box::new(GiftdrawError::Internal("test".into())),
            Box::new(GiftdrawError::InvalidDerangement {
                reason: "x".into(),
            }),
        ];
        for err in errors {
            let msg = format!("{err}");
            assert!(
                msg.starts_with("GD_ERR_"),
                "Error missing GD_ERR_ prefix: {msg}"
            );
        }
    }
}
