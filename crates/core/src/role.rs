//! # Role Module
//!
//! Defines Role and User for the three actor kinds in the system.
//! - Driver: sees only their own offenses and payments
//! - Officer: records and edits offenses, processes cash payments
//! - Superadmin: resolves deletion requests, sees everything

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Actor role in the system.
///
/// A closed enumeration: each role has a fixed capability set, with no
/// inheritance between roles. An invalid role string is rejected at
/// parse time rather than compared as free-form text at use sites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Driver - owns offenses recorded against their email
    Driver,
    /// Traffic officer - records violations, collects cash payments
    Officer,
    /// Superadmin - approves or rejects deletion requests
    Superadmin,
}

impl Role {
    /// Code string as stored in the database
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Driver => "driver",
            Role::Officer => "officer",
            Role::Superadmin => "superadmin",
        }
    }

    /// Parse from a stored string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "driver" => Some(Role::Driver),
            "officer" => Some(Role::Officer),
            "superadmin" => Some(Role::Superadmin),
            _ => None,
        }
    }

    /// Staff roles see every offense and payment, not just their own
    pub fn sees_all_records(&self) -> bool {
        matches!(self, Role::Officer | Role::Superadmin)
    }

    /// Only superadmins resolve deletion requests
    pub fn can_resolve_deletions(&self) -> bool {
        matches!(self, Role::Superadmin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An authenticated user of the system.
///
/// Password hashing, JWT issuance and TOTP verification happen outside
/// this crate; the hash and secret fields are carried as opaque data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    /// Unique; ownership of offenses and payments is derived from it
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub profile_image: Option<String>,
    pub two_factor_enabled: bool,
    #[serde(skip_serializing)]
    pub two_factor_secret: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a new user; the role is fixed at creation time.
    pub fn new(name: &str, email: &str, password_hash: &str, role: Role) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            role,
            profile_image: None,
            two_factor_enabled: false,
            two_factor_secret: None,
            created_at: Utc::now(),
        }
    }

    pub fn driver(name: &str, email: &str) -> Self {
        Self::new(name, email, "", Role::Driver)
    }

    pub fn officer(name: &str, email: &str) -> Self {
        Self::new(name, email, "", Role::Officer)
    }

    pub fn superadmin(name: &str, email: &str) -> Self {
        Self::new(name, email, "", Role::Superadmin)
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}> ({})", self.name, self.email, self.role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_str_round_trip() {
        assert_eq!(Role::Driver.as_str(), "driver");
        assert_eq!(Role::Superadmin.as_str(), "superadmin");
        assert_eq!(Role::parse("OFFICER"), Some(Role::Officer));
        assert_eq!(Role::parse("admin"), None);
    }

    #[test]
    fn test_role_capabilities() {
        assert!(!Role::Driver.sees_all_records());
        assert!(Role::Officer.sees_all_records());
        assert!(Role::Superadmin.sees_all_records());

        assert!(Role::Superadmin.can_resolve_deletions());
        assert!(!Role::Officer.can_resolve_deletions());
        assert!(!Role::Driver.can_resolve_deletions());
    }

    #[test]
    fn test_user_creation() {
        let user = User::driver("Asha Noor", "asha@example.com");
        assert_eq!(user.role, Role::Driver);
        assert!(!user.two_factor_enabled);
        assert!(user.profile_image.is_none());

        let admin = User::superadmin("Root", "root@trafdesk.local");
        assert!(admin.role.can_resolve_deletions());
    }

    #[test]
    fn test_user_display() {
        let user = User::officer("Hodan Ali", "hodan@police.gov");
        assert_eq!(format!("{}", user), "Hodan Ali <hodan@police.gov> (officer)");
    }
}
