//! Offense operations - create, edit, status updates, role-scoped reads
//!
//! Every mutation appends its audit entry inside the same transaction
//! as the write.

use crate::access::{self, Action};
use crate::error::{BusinessError, BusinessResult};
use crate::services::ServiceContext;
use crate::audit;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde_json::json;
use trafdesk_core::{
    AuditAction, OffenceType, Offense, OffenseStatus, PaymentStatus, Role, User,
};
use trafdesk_persistence::{OffenseRepo, PaymentRepo, PersistenceError, UserRepo};

/// Input for recording a new offense.
#[derive(Debug, Clone)]
pub struct NewOffense {
    pub driver_email: String,
    pub vehicle_number: String,
    pub offence_type: OffenceType,
    pub location: String,
    /// Defaults to now when absent
    pub date: Option<DateTime<Utc>>,
    pub fine: Decimal,
}

/// Partial update of an offense's descriptive fields.
#[derive(Debug, Clone, Default)]
pub struct OffenseUpdate {
    pub vehicle_number: Option<String>,
    pub offence_type: Option<OffenceType>,
    pub location: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub fine: Option<Decimal>,
}

impl OffenseUpdate {
    pub fn is_empty(&self) -> bool {
        self.vehicle_number.is_none()
            && self.offence_type.is_none()
            && self.location.is_none()
            && self.date.is_none()
            && self.fine.is_none()
    }
}

/// Offense Service - records and maintains violations
pub struct OffenseService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> OffenseService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Record a new offense against a registered driver.
    pub async fn create(
        &self,
        actor: &User,
        input: NewOffense,
        ip: Option<&str>,
    ) -> BusinessResult<Offense> {
        access::ensure(actor, Action::CreateOffense)?;

        if input.fine <= Decimal::ZERO {
            return Err(BusinessError::Validation(format!(
                "Fine must be positive: {}",
                input.fine
            )));
        }

        let driver = UserRepo::get_by_email(self.ctx.pool(), &input.driver_email)
            .await?
            .ok_or_else(|| BusinessError::not_found("Driver", &input.driver_email))?;

        let offense = Offense::new(
            &driver.id,
            &driver.name,
            &driver.email,
            &input.vehicle_number,
            input.offence_type,
            &input.location,
            input.date.unwrap_or_else(Utc::now),
            input.fine,
        );

        let mut tx = self.ctx.pool().begin().await.map_err(PersistenceError::from)?;
        OffenseRepo::insert(&mut *tx, &offense).await?;
        audit::record(
            &mut *tx,
            &actor.id,
            AuditAction::OffenseCreated,
            json!({
                "offenseId": offense.id,
                "offenceType": offense.offence_type.as_str(),
                "driverEmail": offense.driver_email,
                "location": offense.location,
                "fine": offense.fine,
                "createdBy": actor.email,
            }),
            ip,
        )
        .await?;
        tx.commit().await.map_err(PersistenceError::from)?;

        tracing::info!(offense_id = %offense.id, officer = %actor.email, "offense recorded");
        Ok(offense)
    }

    /// Edit an offense's descriptive fields (officer path).
    pub async fn update(
        &self,
        actor: &User,
        offense_id: &str,
        changes: OffenseUpdate,
        ip: Option<&str>,
    ) -> BusinessResult<Offense> {
        access::ensure(actor, Action::EditOffense)?;

        if changes.is_empty() {
            return Err(BusinessError::Validation("No fields to update".to_string()));
        }
        if let Some(fine) = changes.fine {
            if fine <= Decimal::ZERO {
                return Err(BusinessError::Validation(format!(
                    "Fine must be positive: {fine}"
                )));
            }
        }

        let original = OffenseRepo::find_by_id(self.ctx.pool(), offense_id)
            .await?
            .ok_or_else(|| BusinessError::not_found("Offense", offense_id))?;

        let mut updated = original.clone();
        if let Some(v) = changes.vehicle_number {
            updated.vehicle_number = v;
        }
        if let Some(t) = changes.offence_type {
            updated.offence_type = t;
        }
        if let Some(l) = changes.location {
            updated.location = l;
        }
        if let Some(d) = changes.date {
            updated.date = d;
        }
        if let Some(f) = changes.fine {
            updated.fine = f;
        }

        let mut tx = self.ctx.pool().begin().await.map_err(PersistenceError::from)?;
        OffenseRepo::update_fields(&mut *tx, &updated).await?;
        audit::record(
            &mut *tx,
            &actor.id,
            AuditAction::OffenseUpdated,
            json!({
                "offenseId": offense_id,
                "originalData": serde_json::to_value(&original).map_err(PersistenceError::from)?,
                "newData": serde_json::to_value(&updated).map_err(PersistenceError::from)?,
            }),
            ip,
        )
        .await?;
        tx.commit().await.map_err(PersistenceError::from)?;

        Ok(updated)
    }

    /// Update an offense's payment status; the linked payments follow.
    pub async fn update_status(
        &self,
        actor: &User,
        offense_id: &str,
        status: OffenseStatus,
        ip: Option<&str>,
    ) -> BusinessResult<Offense> {
        access::ensure(actor, Action::UpdateOffenseStatus)?;

        let mut offense = OffenseRepo::find_by_id(self.ctx.pool(), offense_id)
            .await?
            .ok_or_else(|| BusinessError::not_found("Offense", offense_id))?;
        let original_status = offense.status;

        let payment_status = if status == OffenseStatus::Paid {
            PaymentStatus::Completed
        } else {
            PaymentStatus::Pending
        };

        let mut tx = self.ctx.pool().begin().await.map_err(PersistenceError::from)?;
        OffenseRepo::update_status(&mut *tx, offense_id, status).await?;
        PaymentRepo::set_status_by_offense(&mut *tx, offense_id, payment_status).await?;
        audit::record(
            &mut *tx,
            &actor.id,
            AuditAction::OffenseStatusUpdated,
            json!({
                "offenseId": offense_id,
                "originalStatus": original_status.as_str(),
                "newStatus": status.as_str(),
            }),
            ip,
        )
        .await?;
        tx.commit().await.map_err(PersistenceError::from)?;

        offense.status = status;
        Ok(offense)
    }

    /// Role-scoped listing: drivers see only offenses recorded against
    /// their own email, staff see everything.
    pub async fn list(&self, actor: &User) -> BusinessResult<Vec<Offense>> {
        let offenses = match actor.role {
            Role::Driver => {
                OffenseRepo::get_by_driver_email(self.ctx.pool(), &actor.email).await?
            }
            Role::Officer | Role::Superadmin => OffenseRepo::get_all(self.ctx.pool()).await?,
        };
        Ok(offenses)
    }

    /// Fetch a single offense, enforcing read ownership for drivers.
    pub async fn get(&self, actor: &User, offense_id: &str) -> BusinessResult<Offense> {
        let offense = OffenseRepo::find_by_id(self.ctx.pool(), offense_id)
            .await?
            .ok_or_else(|| BusinessError::not_found("Offense", offense_id))?;
        access::ensure_can_view_record(actor, &offense.driver_email)?;
        Ok(offense)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use trafdesk_persistence::{init_memory_database, AuditLogRepo};

    async fn setup() -> (ServiceContext, User, User, User) {
        let pool = init_memory_database().await.unwrap();
        let ctx = ServiceContext::new(pool);
        let driver = User::driver("Asha Noor", "asha@example.com");
        let officer = User::officer("Hodan Ali", "hodan@police.gov");
        let admin = User::superadmin("Root", "root@trafdesk.local");
        for user in [&driver, &officer, &admin] {
            UserRepo::insert(ctx.pool(), user).await.unwrap();
        }
        (ctx, driver, officer, admin)
    }

    fn new_offense_input(driver_email: &str) -> NewOffense {
        NewOffense {
            driver_email: driver_email.to_string(),
            vehicle_number: "KAA-123".to_string(),
            offence_type: OffenceType::Speeding,
            location: "Main St".to_string(),
            date: None,
            fine: dec!(100),
        }
    }

    #[tokio::test]
    async fn test_officer_creates_offense_with_audit() {
        let (ctx, driver, officer, _) = setup().await;
        let service = OffenseService::new(&ctx);

        let offense = service
            .create(&officer, new_offense_input(&driver.email), Some("10.0.0.1"))
            .await
            .unwrap();

        assert_eq!(offense.status, OffenseStatus::Unpaid);
        assert_eq!(offense.driver_id, driver.id);
        assert_eq!(offense.driver_name, "Asha Noor");

        let count = AuditLogRepo::count_by_action(ctx.pool(), "OFFENSE_CREATED")
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_driver_cannot_create_offense() {
        let (ctx, driver, _, _) = setup().await;
        let service = OffenseService::new(&ctx);

        let err = service
            .create(&driver, new_offense_input(&driver.email), None)
            .await
            .unwrap_err();
        assert!(err.is_forbidden());

        // Nothing written, not even audit
        let count = AuditLogRepo::count_by_action(ctx.pool(), "OFFENSE_CREATED")
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_unknown_driver_is_not_found() {
        let (ctx, _, officer, _) = setup().await;
        let service = OffenseService::new(&ctx);

        let err = service
            .create(&officer, new_offense_input("ghost@example.com"), None)
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_non_positive_fine_rejected() {
        let (ctx, driver, officer, _) = setup().await;
        let service = OffenseService::new(&ctx);

        let mut input = new_offense_input(&driver.email);
        input.fine = dec!(0);
        let err = service.create(&officer, input, None).await.unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn test_edit_is_officer_only() {
        let (ctx, driver, officer, admin) = setup().await;
        let service = OffenseService::new(&ctx);
        let offense = service
            .create(&officer, new_offense_input(&driver.email), None)
            .await
            .unwrap();

        let changes = OffenseUpdate {
            location: Some("5th Ave".to_string()),
            fine: Some(dec!(150)),
            ..Default::default()
        };

        // Superadmin edits go through the officer path
        let err = service
            .update(&admin, &offense.id, changes.clone(), None)
            .await
            .unwrap_err();
        assert!(err.is_forbidden());

        let updated = service
            .update(&officer, &offense.id, changes, None)
            .await
            .unwrap();
        assert_eq!(updated.location, "5th Ave");
        assert_eq!(updated.fine, dec!(150));

        let count = AuditLogRepo::count_by_action(ctx.pool(), "OFFENSE_UPDATED")
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_status_update_cascades_to_payments() {
        let (ctx, driver, officer, _) = setup().await;
        let service = OffenseService::new(&ctx);
        let offense = service
            .create(&officer, new_offense_input(&driver.email), None)
            .await
            .unwrap();

        let payment = trafdesk_core::Payment::completed(
            &offense.id,
            &driver.id,
            &driver.name,
            &driver.email,
            "KAA-123",
            dec!(100),
            trafdesk_core::PaymentMethod::Card,
        );
        PaymentRepo::insert(ctx.pool(), &payment).await.unwrap();
        PaymentRepo::set_status_by_offense(ctx.pool(), &offense.id, PaymentStatus::Pending)
            .await
            .unwrap();

        let updated = service
            .update_status(&officer, &offense.id, OffenseStatus::Paid, None)
            .await
            .unwrap();
        assert_eq!(updated.status, OffenseStatus::Paid);

        let payments = PaymentRepo::get_by_offense(ctx.pool(), &offense.id)
            .await
            .unwrap();
        assert_eq!(payments[0].status, PaymentStatus::Completed);

        let err = service
            .update_status(&driver, &offense.id, OffenseStatus::Unpaid, None)
            .await
            .unwrap_err();
        assert!(err.is_forbidden());
    }

    #[tokio::test]
    async fn test_role_scoped_listing() {
        let (ctx, driver, officer, _) = setup().await;
        let service = OffenseService::new(&ctx);

        let other = User::driver("Yonis Ahmed", "yonis@example.com");
        UserRepo::insert(ctx.pool(), &other).await.unwrap();

        service
            .create(&officer, new_offense_input(&driver.email), None)
            .await
            .unwrap();
        service
            .create(&officer, new_offense_input(&other.email), None)
            .await
            .unwrap();

        assert_eq!(service.list(&officer).await.unwrap().len(), 2);
        let own = service.list(&driver).await.unwrap();
        assert_eq!(own.len(), 1);
        assert_eq!(own[0].driver_email, driver.email);
    }

    #[tokio::test]
    async fn test_get_enforces_read_ownership() {
        let (ctx, driver, officer, _) = setup().await;
        let service = OffenseService::new(&ctx);

        let other = User::driver("Yonis Ahmed", "yonis@example.com");
        UserRepo::insert(ctx.pool(), &other).await.unwrap();
        let offense = service
            .create(&officer, new_offense_input(&other.email), None)
            .await
            .unwrap();

        let err = service.get(&driver, &offense.id).await.unwrap_err();
        assert!(err.is_forbidden());
        assert!(service.get(&other, &offense.id).await.is_ok());
    }
}
