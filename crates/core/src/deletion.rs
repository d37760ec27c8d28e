//! # Deletion Request Module
//!
//! A proposal to permanently remove an offense, subject to superadmin
//! approval. Carries a snapshot of the offense taken at request time
//! so the record stays meaningful after the offense is deleted.

use crate::error::CoreError;
use crate::offense::{OffenceType, Offense};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Lifecycle state of a deletion request.
///
/// `Pending` is the only non-terminal state; a request leaves it
/// exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Approved => "approved",
            RequestStatus::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(RequestStatus::Pending),
            "approved" => Some(RequestStatus::Approved),
            "rejected" => Some(RequestStatus::Rejected),
            _ => None,
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A superadmin's verdict on a pending request.
///
/// Deliberately narrower than [`RequestStatus`]: `pending` is not a
/// valid decision, so an invalid input fails at parse time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Approved,
    Rejected,
}

impl Decision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Approved => "approved",
            Decision::Rejected => "rejected",
        }
    }

    /// Parse a caller-supplied decision string
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "approved" => Ok(Decision::Approved),
            "rejected" => Ok(Decision::Rejected),
            other => Err(CoreError::InvalidDecision(other.to_string())),
        }
    }
}

impl From<Decision> for RequestStatus {
    fn from(d: Decision) -> Self {
        match d {
            Decision::Approved => RequestStatus::Approved,
            Decision::Rejected => RequestStatus::Rejected,
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Denormalized copy of an offense's fields at request-creation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OffenseSnapshot {
    pub driver_name: String,
    pub vehicle_number: String,
    pub offence_type: OffenceType,
    pub location: String,
    pub date: DateTime<Utc>,
    pub fine: Decimal,
}

impl From<&Offense> for OffenseSnapshot {
    fn from(offense: &Offense) -> Self {
        Self {
            driver_name: offense.driver_name.clone(),
            vehicle_number: offense.vehicle_number.clone(),
            offence_type: offense.offence_type,
            location: offense.location.clone(),
            date: offense.date,
            fine: offense.fine,
        }
    }
}

/// A request to permanently remove an offense.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeletionRequest {
    pub id: String,
    /// Not a foreign key: the offense may be deleted while this record
    /// survives with its snapshot.
    pub offense_id: String,
    pub requested_by: String,
    pub reason: String,
    pub status: RequestStatus,
    pub timestamp: DateTime<Utc>,
    pub snapshot: OffenseSnapshot,
}

impl DeletionRequest {
    /// Create a pending request, snapshotting the offense as it stands.
    ///
    /// The reason is required; an empty or whitespace-only reason is a
    /// validation error.
    pub fn new(offense: &Offense, requested_by: &str, reason: &str) -> Result<Self, CoreError> {
        if reason.trim().is_empty() {
            return Err(CoreError::EmptyReason);
        }
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            offense_id: offense.id.clone(),
            requested_by: requested_by.to_string(),
            reason: reason.to_string(),
            status: RequestStatus::Pending,
            timestamp: Utc::now(),
            snapshot: OffenseSnapshot::from(offense),
        })
    }

    pub fn is_pending(&self) -> bool {
        self.status == RequestStatus::Pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_offense() -> Offense {
        Offense::new(
            "u-1",
            "Asha Noor",
            "asha@example.com",
            "KAA-123",
            OffenceType::RedLight,
            "5th Ave",
            Utc::now(),
            dec!(250),
        )
    }

    #[test]
    fn test_request_status_round_trip() {
        assert_eq!(RequestStatus::parse("pending"), Some(RequestStatus::Pending));
        assert_eq!(RequestStatus::parse("approved"), Some(RequestStatus::Approved));
        assert_eq!(RequestStatus::parse("Pending"), None);
    }

    #[test]
    fn test_decision_parse() {
        assert_eq!(Decision::parse("approved").unwrap(), Decision::Approved);
        assert_eq!(Decision::parse("rejected").unwrap(), Decision::Rejected);
        assert!(matches!(
            Decision::parse("deleted"),
            Err(CoreError::InvalidDecision(_))
        ));
        assert!(Decision::parse("pending").is_err());
    }

    #[test]
    fn test_new_request_snapshots_offense() {
        let offense = sample_offense();
        let request = DeletionRequest::new(&offense, "u-2", "duplicate entry").unwrap();

        assert!(request.is_pending());
        assert_eq!(request.offense_id, offense.id);
        assert_eq!(request.snapshot.driver_name, "Asha Noor");
        assert_eq!(request.snapshot.fine, dec!(250));
        assert_eq!(request.snapshot.offence_type, OffenceType::RedLight);
    }

    #[test]
    fn test_empty_reason_rejected() {
        let offense = sample_offense();
        assert!(matches!(
            DeletionRequest::new(&offense, "u-2", ""),
            Err(CoreError::EmptyReason)
        ));
        assert!(matches!(
            DeletionRequest::new(&offense, "u-2", "   "),
            Err(CoreError::EmptyReason)
        ));
    }
}
