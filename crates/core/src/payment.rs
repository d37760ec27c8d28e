//! # Payment Module
//!
//! Payments recorded against offense fines.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// How a payment was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMethod {
    Cash,
    Card,
    MobileMoney,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Cash",
            PaymentMethod::Card => "Card",
            PaymentMethod::MobileMoney => "Mobile Money",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Cash" => Some(PaymentMethod::Cash),
            "Card" => Some(PaymentMethod::Card),
            "Mobile Money" => Some(PaymentMethod::MobileMoney),
            _ => None,
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Settlement state of a payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "Pending",
            PaymentStatus::Completed => "Completed",
            PaymentStatus::Failed => "Failed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Pending" => Some(PaymentStatus::Pending),
            "Completed" => Some(PaymentStatus::Completed),
            "Failed" => Some(PaymentStatus::Failed),
            _ => None,
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A payment against an offense's fine.
///
/// Keeps its `offense_id` even after the offense is removed through
/// the deletion workflow: payments are financial records with their
/// own lifecycle and are never cascade-deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: String,
    pub offense_id: String,
    pub driver_id: String,
    pub driver_name: String,
    pub driver_email: String,
    pub vehicle_number: String,
    pub amount: Decimal,
    pub method: PaymentMethod,
    pub status: PaymentStatus,
    pub date: DateTime<Utc>,
}

impl Payment {
    /// Create a completed payment covering an offense's fine.
    #[allow(clippy::too_many_arguments)]
    pub fn completed(
        offense_id: &str,
        driver_id: &str,
        driver_name: &str,
        driver_email: &str,
        vehicle_number: &str,
        amount: Decimal,
        method: PaymentMethod,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            offense_id: offense_id.to_string(),
            driver_id: driver_id.to_string(),
            driver_name: driver_name.to_string(),
            driver_email: driver_email.to_string(),
            vehicle_number: vehicle_number.to_string(),
            amount,
            method,
            status: PaymentStatus::Completed,
            date: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_method_round_trip() {
        assert_eq!(PaymentMethod::parse("Cash"), Some(PaymentMethod::Cash));
        assert_eq!(
            PaymentMethod::parse("Mobile Money"),
            Some(PaymentMethod::MobileMoney)
        );
        assert_eq!(PaymentMethod::parse("Cheque"), None);
    }

    #[test]
    fn test_status_round_trip() {
        assert_eq!(
            PaymentStatus::parse("Completed"),
            Some(PaymentStatus::Completed)
        );
        assert_eq!(PaymentStatus::parse("Failed"), Some(PaymentStatus::Failed));
        assert_eq!(PaymentStatus::parse("Done"), None);
    }

    #[test]
    fn test_completed_payment() {
        let payment = Payment::completed(
            "off-1",
            "u-1",
            "Asha Noor",
            "asha@example.com",
            "KAA-123",
            dec!(100),
            PaymentMethod::Card,
        );
        assert_eq!(payment.status, PaymentStatus::Completed);
        assert_eq!(payment.amount, dec!(100));
        assert_eq!(payment.method, PaymentMethod::Card);
    }
}
