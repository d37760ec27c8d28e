//! Database schema definitions
//!
//! Row types for sqlx mapping from SQLite tables, with conversions to
//! and from the domain types. Decimals are stored as TEXT; enums as
//! their `as_str` code, rejected on read if unknown.

use crate::error::{PersistenceError, PersistenceResult};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use trafdesk_core::{
    AuditAction, AuditLogEntry, DeletionRequest, OffenceType, Offense, OffenseSnapshot,
    OffenseStatus, Payment, PaymentMethod, PaymentStatus, RequestStatus, Role, User,
};

/// Row type for the `users` table
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct UserRow {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub profile_image: Option<String>,
    pub two_factor_enabled: bool,
    pub two_factor_secret: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Row type for the `offenses` table
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct OffenseRow {
    pub id: String,
    pub driver_name: String,
    pub driver_email: String,
    pub vehicle_number: String,
    pub offence_type: String,
    pub location: String,
    pub date: DateTime<Utc>,
    pub fine: String, // Decimal stored as TEXT
    pub status: String,
    pub driver_id: String,
    pub deletion_requested: bool,
    pub deletion_requested_by: Option<String>,
    pub deletion_request_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Row type for the `deletion_requests` table
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct DeletionRequestRow {
    pub id: String,
    pub offense_id: String,
    pub requested_by: String,
    pub reason: String,
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub snapshot_driver_name: String,
    pub snapshot_vehicle_number: String,
    pub snapshot_offence_type: String,
    pub snapshot_location: String,
    pub snapshot_date: DateTime<Utc>,
    pub snapshot_fine: String, // Decimal stored as TEXT
}

/// Row type for the `audit_log` table
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct AuditLogRow {
    pub id: String,
    pub user_id: String,
    pub action: String,
    pub details: String, // JSON stored as TEXT
    pub timestamp: DateTime<Utc>,
    pub ip_address: Option<String>,
}

/// Row type for the `payments` table
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct PaymentRow {
    pub id: String,
    pub offense_id: String,
    pub driver_id: String,
    pub driver_name: String,
    pub driver_email: String,
    pub vehicle_number: String,
    pub amount: String, // Decimal stored as TEXT
    pub method: String,
    pub status: String,
    pub date: DateTime<Utc>,
}

// === Conversion implementations ===

fn parse_decimal(field: &str, value: &str) -> PersistenceResult<Decimal> {
    Decimal::from_str(value)
        .map_err(|_| PersistenceError::InvalidDecimal(format!("{field} = {value}")))
}

impl From<&User> for UserRow {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
            role: user.role.as_str().to_string(),
            profile_image: user.profile_image.clone(),
            two_factor_enabled: user.two_factor_enabled,
            two_factor_secret: user.two_factor_secret.clone(),
            created_at: user.created_at,
        }
    }
}

impl TryFrom<UserRow> for User {
    type Error = PersistenceError;

    fn try_from(row: UserRow) -> PersistenceResult<Self> {
        let role = Role::parse(&row.role)
            .ok_or_else(|| PersistenceError::invalid_enum("role", &row.role))?;
        Ok(Self {
            id: row.id,
            name: row.name,
            email: row.email,
            password_hash: row.password_hash,
            role,
            profile_image: row.profile_image,
            two_factor_enabled: row.two_factor_enabled,
            two_factor_secret: row.two_factor_secret,
            created_at: row.created_at,
        })
    }
}

impl From<&Offense> for OffenseRow {
    fn from(offense: &Offense) -> Self {
        Self {
            id: offense.id.clone(),
            driver_name: offense.driver_name.clone(),
            driver_email: offense.driver_email.clone(),
            vehicle_number: offense.vehicle_number.clone(),
            offence_type: offense.offence_type.as_str().to_string(),
            location: offense.location.clone(),
            date: offense.date,
            fine: offense.fine.to_string(),
            status: offense.status.as_str().to_string(),
            driver_id: offense.driver_id.clone(),
            deletion_requested: offense.deletion_requested,
            deletion_requested_by: offense.deletion_requested_by.clone(),
            deletion_request_reason: offense.deletion_request_reason.clone(),
            created_at: offense.created_at,
        }
    }
}

impl TryFrom<OffenseRow> for Offense {
    type Error = PersistenceError;

    fn try_from(row: OffenseRow) -> PersistenceResult<Self> {
        let offence_type = OffenceType::parse(&row.offence_type)
            .ok_or_else(|| PersistenceError::invalid_enum("offence_type", &row.offence_type))?;
        let status = OffenseStatus::parse(&row.status)
            .ok_or_else(|| PersistenceError::invalid_enum("status", &row.status))?;
        let fine = parse_decimal("fine", &row.fine)?;
        Ok(Self {
            id: row.id,
            driver_name: row.driver_name,
            driver_email: row.driver_email,
            vehicle_number: row.vehicle_number,
            offence_type,
            location: row.location,
            date: row.date,
            fine,
            status,
            driver_id: row.driver_id,
            deletion_requested: row.deletion_requested,
            deletion_requested_by: row.deletion_requested_by,
            deletion_request_reason: row.deletion_request_reason,
            created_at: row.created_at,
        })
    }
}

impl From<&DeletionRequest> for DeletionRequestRow {
    fn from(request: &DeletionRequest) -> Self {
        Self {
            id: request.id.clone(),
            offense_id: request.offense_id.clone(),
            requested_by: request.requested_by.clone(),
            reason: request.reason.clone(),
            status: request.status.as_str().to_string(),
            timestamp: request.timestamp,
            snapshot_driver_name: request.snapshot.driver_name.clone(),
            snapshot_vehicle_number: request.snapshot.vehicle_number.clone(),
            snapshot_offence_type: request.snapshot.offence_type.as_str().to_string(),
            snapshot_location: request.snapshot.location.clone(),
            snapshot_date: request.snapshot.date,
            snapshot_fine: request.snapshot.fine.to_string(),
        }
    }
}

impl TryFrom<DeletionRequestRow> for DeletionRequest {
    type Error = PersistenceError;

    fn try_from(row: DeletionRequestRow) -> PersistenceResult<Self> {
        let status = RequestStatus::parse(&row.status)
            .ok_or_else(|| PersistenceError::invalid_enum("status", &row.status))?;
        let offence_type = OffenceType::parse(&row.snapshot_offence_type).ok_or_else(|| {
            PersistenceError::invalid_enum("snapshot_offence_type", &row.snapshot_offence_type)
        })?;
        let fine = parse_decimal("snapshot_fine", &row.snapshot_fine)?;
        Ok(Self {
            id: row.id,
            offense_id: row.offense_id,
            requested_by: row.requested_by,
            reason: row.reason,
            status,
            timestamp: row.timestamp,
            snapshot: OffenseSnapshot {
                driver_name: row.snapshot_driver_name,
                vehicle_number: row.snapshot_vehicle_number,
                offence_type,
                location: row.snapshot_location,
                date: row.snapshot_date,
                fine,
            },
        })
    }
}

impl TryFrom<&AuditLogEntry> for AuditLogRow {
    type Error = PersistenceError;

    fn try_from(entry: &AuditLogEntry) -> PersistenceResult<Self> {
        Ok(Self {
            id: entry.id.clone(),
            user_id: entry.user_id.clone(),
            action: entry.action.as_str().to_string(),
            details: serde_json::to_string(&entry.details)?,
            timestamp: entry.timestamp,
            ip_address: entry.ip_address.clone(),
        })
    }
}

impl TryFrom<AuditLogRow> for AuditLogEntry {
    type Error = PersistenceError;

    fn try_from(row: AuditLogRow) -> PersistenceResult<Self> {
        let action = AuditAction::parse(&row.action)
            .ok_or_else(|| PersistenceError::invalid_enum("action", &row.action))?;
        Ok(Self {
            id: row.id,
            user_id: row.user_id,
            action,
            details: serde_json::from_str(&row.details)?,
            timestamp: row.timestamp,
            ip_address: row.ip_address,
        })
    }
}

impl From<&Payment> for PaymentRow {
    fn from(payment: &Payment) -> Self {
        Self {
            id: payment.id.clone(),
            offense_id: payment.offense_id.clone(),
            driver_id: payment.driver_id.clone(),
            driver_name: payment.driver_name.clone(),
            driver_email: payment.driver_email.clone(),
            vehicle_number: payment.vehicle_number.clone(),
            amount: payment.amount.to_string(),
            method: payment.method.as_str().to_string(),
            status: payment.status.as_str().to_string(),
            date: payment.date,
        }
    }
}

impl TryFrom<PaymentRow> for Payment {
    type Error = PersistenceError;

    fn try_from(row: PaymentRow) -> PersistenceResult<Self> {
        let method = PaymentMethod::parse(&row.method)
            .ok_or_else(|| PersistenceError::invalid_enum("method", &row.method))?;
        let status = PaymentStatus::parse(&row.status)
            .ok_or_else(|| PersistenceError::invalid_enum("status", &row.status))?;
        let amount = parse_decimal("amount", &row.amount)?;
        Ok(Self {
            id: row.id,
            offense_id: row.offense_id,
            driver_id: row.driver_id,
            driver_name: row.driver_name,
            driver_email: row.driver_email,
            vehicle_number: row.vehicle_number,
            amount,
            method,
            status,
            date: row.date,
        })
    }
}
