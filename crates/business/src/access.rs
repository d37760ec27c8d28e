//! Access policy
//!
//! The capability table deciding, for a (role, action) pair, whether a
//! request proceeds. Evaluation is side-effect-free and happens before
//! any business read or write. Ownership (a driver touching their own
//! offense) is always re-derived from stored data by the caller, never
//! from a client-supplied id.

use crate::error::{BusinessError, BusinessResult};
use std::fmt;
use trafdesk_core::{Offense, Role, User};

/// Gated actions over the system's resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// See every offense and payment, not just one's own
    ViewAllRecords,
    CreateOffense,
    /// Edit an offense's descriptive fields (officer path only)
    EditOffense,
    UpdateOffenseStatus,
    /// Submit a deletion request; for drivers this additionally
    /// requires ownership of the offense
    RequestDeletion,
    ResolveDeletion,
    ViewDeletionQueue,
    ViewAuditLog,
}

impl Action {
    fn describe(&self) -> &'static str {
        match self {
            Action::ViewAllRecords => "view all records",
            Action::CreateOffense => "create offenses",
            Action::EditOffense => "edit offenses",
            Action::UpdateOffenseStatus => "update offense status",
            Action::RequestDeletion => "request offense deletion",
            Action::ResolveDeletion => "resolve deletion requests",
            Action::ViewDeletionQueue => "view the deletion-request queue",
            Action::ViewAuditLog => "view the audit log",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.describe())
    }
}

/// The capability table. Each role is an independent variant; there is
/// no inheritance between roles.
pub fn permits(role: Role, action: Action) -> bool {
    match action {
        Action::ViewAllRecords => role.sees_all_records(),
        Action::CreateOffense => matches!(role, Role::Officer | Role::Superadmin),
        // Superadmin edits go through the officer path, per policy
        Action::EditOffense => matches!(role, Role::Officer),
        Action::UpdateOffenseStatus => matches!(role, Role::Officer | Role::Superadmin),
        // Drivers may request deletion too, but only for an offense
        // they own; see ensure_can_request_deletion
        Action::RequestDeletion => true,
        Action::ResolveDeletion | Action::ViewDeletionQueue | Action::ViewAuditLog => {
            role.can_resolve_deletions()
        }
    }
}

/// Reject with Forbidden unless the user's role permits the action.
pub fn ensure(user: &User, action: Action) -> BusinessResult<()> {
    if permits(user.role, action) {
        Ok(())
    } else {
        Err(BusinessError::forbidden(user.role, action.describe()))
    }
}

/// Deletion-request authorization: staff may request for any offense,
/// a driver only for an offense recorded against their own email.
pub fn ensure_can_request_deletion(user: &User, offense: &Offense) -> BusinessResult<()> {
    match user.role {
        Role::Officer | Role::Superadmin => Ok(()),
        Role::Driver if offense.is_owned_by(&user.email) => Ok(()),
        Role::Driver => Err(BusinessError::forbidden(
            user.role,
            "request deletion of another driver's offense",
        )),
    }
}

/// Read authorization for a single offense or payment record.
pub fn ensure_can_view_record(user: &User, owner_email: &str) -> BusinessResult<()> {
    if user.role.sees_all_records() || user.email == owner_email {
        Ok(())
    } else {
        Err(BusinessError::forbidden(
            user.role,
            "view another driver's records",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;
    use trafdesk_core::OffenceType;

    fn offense_for(email: &str) -> Offense {
        Offense::new(
            "u-1",
            "Asha Noor",
            email,
            "KAA-123",
            OffenceType::Speeding,
            "Main St",
            Utc::now(),
            Decimal::new(100, 0),
        )
    }

    #[test]
    fn test_capability_table() {
        // view all
        assert!(!permits(Role::Driver, Action::ViewAllRecords));
        assert!(permits(Role::Officer, Action::ViewAllRecords));
        assert!(permits(Role::Superadmin, Action::ViewAllRecords));

        // create
        assert!(!permits(Role::Driver, Action::CreateOffense));
        assert!(permits(Role::Officer, Action::CreateOffense));
        assert!(permits(Role::Superadmin, Action::CreateOffense));

        // edit fields: officer only
        assert!(!permits(Role::Driver, Action::EditOffense));
        assert!(permits(Role::Officer, Action::EditOffense));
        assert!(!permits(Role::Superadmin, Action::EditOffense));

        // status
        assert!(!permits(Role::Driver, Action::UpdateOffenseStatus));
        assert!(permits(Role::Officer, Action::UpdateOffenseStatus));
        assert!(permits(Role::Superadmin, Action::UpdateOffenseStatus));

        // deletion resolution, queue, audit log: superadmin only
        for action in [
            Action::ResolveDeletion,
            Action::ViewDeletionQueue,
            Action::ViewAuditLog,
        ] {
            assert!(!permits(Role::Driver, action));
            assert!(!permits(Role::Officer, action));
            assert!(permits(Role::Superadmin, action));
        }
    }

    #[test]
    fn test_driver_deletion_request_requires_ownership() {
        let driver = User::driver("Asha Noor", "asha@example.com");
        let own = offense_for("asha@example.com");
        let other = offense_for("someone@example.com");

        assert!(ensure_can_request_deletion(&driver, &own).is_ok());
        let err = ensure_can_request_deletion(&driver, &other).unwrap_err();
        assert!(err.is_forbidden());
    }

    #[test]
    fn test_staff_request_deletion_for_any_offense() {
        let officer = User::officer("Hodan Ali", "hodan@police.gov");
        let admin = User::superadmin("Root", "root@trafdesk.local");
        let offense = offense_for("someone@example.com");

        assert!(ensure_can_request_deletion(&officer, &offense).is_ok());
        assert!(ensure_can_request_deletion(&admin, &offense).is_ok());
    }

    #[test]
    fn test_view_record_ownership() {
        let driver = User::driver("Asha Noor", "asha@example.com");
        assert!(ensure_can_view_record(&driver, "asha@example.com").is_ok());
        assert!(ensure_can_view_record(&driver, "other@example.com").is_err());

        let officer = User::officer("Hodan Ali", "hodan@police.gov");
        assert!(ensure_can_view_record(&officer, "other@example.com").is_ok());
    }

    #[test]
    fn test_ensure_produces_forbidden() {
        let driver = User::driver("Asha Noor", "asha@example.com");
        let err = ensure(&driver, Action::ResolveDeletion).unwrap_err();
        assert!(err.is_forbidden());
        assert!(err.to_string().contains("resolve deletion requests"));
    }
}
