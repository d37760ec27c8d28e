//! # Offense Module
//!
//! A recorded traffic violation tied to a driver and vehicle.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Kind of traffic violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OffenceType {
    Speeding,
    Parking,
    NoLicense,
    RedLight,
    DrunkDriving,
    Other,
}

impl OffenceType {
    /// Display string as stored in the database
    pub fn as_str(&self) -> &'static str {
        match self {
            OffenceType::Speeding => "Speeding",
            OffenceType::Parking => "Parking",
            OffenceType::NoLicense => "No License",
            OffenceType::RedLight => "Red Light",
            OffenceType::DrunkDriving => "Drunk Driving",
            OffenceType::Other => "Other",
        }
    }

    /// Parse from a stored string
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Speeding" => Some(OffenceType::Speeding),
            "Parking" => Some(OffenceType::Parking),
            "No License" => Some(OffenceType::NoLicense),
            "Red Light" => Some(OffenceType::RedLight),
            "Drunk Driving" => Some(OffenceType::DrunkDriving),
            "Other" => Some(OffenceType::Other),
            _ => None,
        }
    }

    /// All known offence types, for stats breakdowns
    pub fn all() -> &'static [OffenceType] {
        &[
            OffenceType::Speeding,
            OffenceType::Parking,
            OffenceType::NoLicense,
            OffenceType::RedLight,
            OffenceType::DrunkDriving,
            OffenceType::Other,
        ]
    }
}

impl fmt::Display for OffenceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Payment state of an offense's fine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OffenseStatus {
    Pending,
    Paid,
    Unpaid,
}

impl OffenseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OffenseStatus::Pending => "Pending",
            OffenseStatus::Paid => "Paid",
            OffenseStatus::Unpaid => "Unpaid",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Pending" => Some(OffenseStatus::Pending),
            "Paid" => Some(OffenseStatus::Paid),
            "Unpaid" => Some(OffenseStatus::Unpaid),
            _ => None,
        }
    }
}

impl fmt::Display for OffenseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A recorded traffic violation.
///
/// Created by an officer against a registered driver. The driver's
/// name and email are denormalized onto the record so ownership checks
/// compare stored data, never caller-supplied ids.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Offense {
    pub id: String,
    pub driver_name: String,
    pub driver_email: String,
    pub vehicle_number: String,
    pub offence_type: OffenceType,
    pub location: String,
    pub date: DateTime<Utc>,
    pub fine: Decimal,
    pub status: OffenseStatus,
    /// Id of the driver's user record
    pub driver_id: String,
    /// Set while a deletion request for this offense is pending
    pub deletion_requested: bool,
    pub deletion_requested_by: Option<String>,
    pub deletion_request_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Offense {
    /// Create a new unpaid offense with no pending deletion request.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        driver_id: &str,
        driver_name: &str,
        driver_email: &str,
        vehicle_number: &str,
        offence_type: OffenceType,
        location: &str,
        date: DateTime<Utc>,
        fine: Decimal,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            driver_name: driver_name.to_string(),
            driver_email: driver_email.to_string(),
            vehicle_number: vehicle_number.to_string(),
            offence_type,
            location: location.to_string(),
            date,
            fine,
            status: OffenseStatus::Unpaid,
            driver_id: driver_id.to_string(),
            deletion_requested: false,
            deletion_requested_by: None,
            deletion_request_reason: None,
            created_at: Utc::now(),
        }
    }

    /// Whether this user address owns the offense
    pub fn is_owned_by(&self, email: &str) -> bool {
        self.driver_email == email
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_offence_type_round_trip() {
        for ot in OffenceType::all() {
            assert_eq!(OffenceType::parse(ot.as_str()), Some(*ot));
        }
        assert_eq!(OffenceType::parse("Jaywalking"), None);
    }

    #[test]
    fn test_status_round_trip() {
        assert_eq!(OffenseStatus::parse("Paid"), Some(OffenseStatus::Paid));
        assert_eq!(OffenseStatus::parse("Unpaid"), Some(OffenseStatus::Unpaid));
        assert_eq!(OffenseStatus::parse("paid"), None);
    }

    #[test]
    fn test_new_offense_defaults() {
        let offense = Offense::new(
            "u-1",
            "Asha Noor",
            "asha@example.com",
            "KAA-123",
            OffenceType::Speeding,
            "Main St",
            Utc::now(),
            dec!(100),
        );
        assert_eq!(offense.status, OffenseStatus::Unpaid);
        assert!(!offense.deletion_requested);
        assert!(offense.deletion_requested_by.is_none());
        assert!(offense.is_owned_by("asha@example.com"));
        assert!(!offense.is_owned_by("other@example.com"));
    }
}
