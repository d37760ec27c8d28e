//! # Audit Log Module
//!
//! Append-only record of sensitive state-changing actions. Entries are
//! created as a side effect of every sensitive mutation and never
//! updated or deleted by the application.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Kind of sensitive action being recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    OffenseCreated,
    OffenseUpdated,
    OffenseStatusUpdated,
    DeletionRequested,
    OffenseDeleted,
    ApprovedDeletionRequest,
    RejectedDeletionRequest,
}

impl AuditAction {
    /// Tag string as stored in the database
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::OffenseCreated => "OFFENSE_CREATED",
            AuditAction::OffenseUpdated => "OFFENSE_UPDATED",
            AuditAction::OffenseStatusUpdated => "OFFENSE_STATUS_UPDATED",
            AuditAction::DeletionRequested => "DELETION_REQUESTED",
            AuditAction::OffenseDeleted => "OFFENSE_DELETED",
            AuditAction::ApprovedDeletionRequest => "APPROVED_DELETION_REQUEST",
            AuditAction::RejectedDeletionRequest => "REJECTED_DELETION_REQUEST",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "OFFENSE_CREATED" => Some(AuditAction::OffenseCreated),
            "OFFENSE_UPDATED" => Some(AuditAction::OffenseUpdated),
            "OFFENSE_STATUS_UPDATED" => Some(AuditAction::OffenseStatusUpdated),
            "DELETION_REQUESTED" => Some(AuditAction::DeletionRequested),
            "OFFENSE_DELETED" => Some(AuditAction::OffenseDeleted),
            "APPROVED_DELETION_REQUEST" => Some(AuditAction::ApprovedDeletionRequest),
            "REJECTED_DELETION_REQUEST" => Some(AuditAction::RejectedDeletionRequest),
            _ => None,
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One appended audit record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLogEntry {
    pub id: String,
    pub user_id: String,
    pub action: AuditAction,
    /// Action-specific structured payload
    pub details: serde_json::Value,
    pub timestamp: DateTime<Utc>,
    pub ip_address: Option<String>,
}

impl AuditLogEntry {
    pub fn new(
        user_id: &str,
        action: AuditAction,
        details: serde_json::Value,
        ip_address: Option<&str>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            action,
            details,
            timestamp: Utc::now(),
            ip_address: ip_address.map(|s| s.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_action_round_trip() {
        let actions = [
            AuditAction::OffenseCreated,
            AuditAction::OffenseUpdated,
            AuditAction::OffenseStatusUpdated,
            AuditAction::DeletionRequested,
            AuditAction::OffenseDeleted,
            AuditAction::ApprovedDeletionRequest,
            AuditAction::RejectedDeletionRequest,
        ];
        for action in actions {
            assert_eq!(AuditAction::parse(action.as_str()), Some(action));
        }
        assert_eq!(AuditAction::parse("LOGIN"), None);
    }

    #[test]
    fn test_new_entry() {
        let entry = AuditLogEntry::new(
            "u-1",
            AuditAction::DeletionRequested,
            json!({"offenseId": "off-1", "reason": "duplicate"}),
            Some("127.0.0.1"),
        );
        assert_eq!(entry.action, AuditAction::DeletionRequested);
        assert_eq!(entry.details["offenseId"], "off-1");
        assert_eq!(entry.ip_address.as_deref(), Some("127.0.0.1"));
    }
}
