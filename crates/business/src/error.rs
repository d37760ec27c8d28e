//! Business layer errors
//!
//! One variant per outcome category the caller must be able to tell
//! apart: authentication, authorization, missing targets, precondition
//! conflicts, validation, and storage failures are never collapsed.

use thiserror::Error;
use trafdesk_core::CoreError;
use trafdesk_persistence::PersistenceError;

/// Business operation errors
#[derive(Debug, Error)]
pub enum BusinessError {
    /// No resolvable identity; the request never reached policy
    /// evaluation.
    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    /// Authenticated, but the role or ownership check failed. No state
    /// was changed.
    #[error("Not authorized: {role} may not {action}")]
    Forbidden { role: String, action: String },

    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// A precondition no longer holds: duplicate pending request, or
    /// resolving an already-resolved request.
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// Underlying storage or audit-log write failed.
    #[error("Storage error: {0}")]
    Persistence(PersistenceError),
}

/// Result type alias for business operations
pub type BusinessResult<T> = Result<T, BusinessError>;

impl BusinessError {
    pub fn forbidden(role: trafdesk_core::Role, action: &str) -> Self {
        Self::Forbidden {
            role: role.to_string(),
            action: action.to_string(),
        }
    }

    pub fn not_found(entity: &str, id: &str) -> Self {
        Self::NotFound {
            entity: entity.to_string(),
            id: id.to_string(),
        }
    }

    pub fn is_forbidden(&self) -> bool {
        matches!(self, Self::Forbidden { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<PersistenceError> for BusinessError {
    fn from(err: PersistenceError) -> Self {
        match err {
            PersistenceError::NotFound { entity, id } => Self::NotFound { entity, id },
            e if e.is_unique_violation() => Self::Conflict(e.to_string()),
            e => Self::Persistence(e),
        }
    }
}

impl From<CoreError> for BusinessError {
    fn from(err: CoreError) -> Self {
        Self::Validation(err.to_string())
    }
}
