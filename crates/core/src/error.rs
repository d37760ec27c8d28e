//! # Error Module
//!
//! Domain validation errors for Trafdesk, using thiserror.

use thiserror::Error;

/// Core domain errors.
///
/// Pure validation failures with no infrastructure concerns.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid role: {0}")]
    InvalidRole(String),

    #[error("Invalid offence type: {0}")]
    InvalidOffenceType(String),

    #[error("Invalid offense status: {0}")]
    InvalidOffenseStatus(String),

    #[error("Invalid request status: {0}")]
    InvalidRequestStatus(String),

    #[error("Invalid decision: {0} (expected 'approved' or 'rejected')")]
    InvalidDecision(String),

    #[error("Invalid payment method: {0}")]
    InvalidPaymentMethod(String),

    #[error("Invalid payment status: {0}")]
    InvalidPaymentStatus(String),

    #[error("Invalid audit action: {0}")]
    InvalidAuditAction(String),

    #[error("Deletion reason must not be empty")]
    EmptyReason,

    #[error("Invalid fine amount: {0}")]
    InvalidFine(String),
}

/// Result type alias with CoreError
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::InvalidRole("admin".to_string());
        assert_eq!(err.to_string(), "Invalid role: admin");

        let err = CoreError::InvalidDecision("deleted".to_string());
        assert!(err.to_string().contains("'approved' or 'rejected'"));

        assert_eq!(
            CoreError::EmptyReason.to_string(),
            "Deletion reason must not be empty"
        );
    }
}
