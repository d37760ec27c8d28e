//! Fine payments
//!
//! Who may pay how: staff record Cash payments taken at the counter,
//! drivers pay their own fines by Card or Mobile Money. A successful
//! payment marks the offense Paid in the same transaction.

use crate::access;
use crate::error::{BusinessError, BusinessResult};
use crate::services::ServiceContext;
use trafdesk_core::{OffenseStatus, Payment, PaymentMethod, Role, User};
use trafdesk_persistence::{OffenseRepo, PaymentRepo, PersistenceError};

/// Payment Service - collects fines against offenses
pub struct PaymentService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> PaymentService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Pay the fine for an offense.
    ///
    /// The amount is always the offense's fine; partial payments are
    /// not a thing. Paying an already-paid offense is a conflict.
    pub async fn submit(
        &self,
        actor: &User,
        offense_id: &str,
        method: PaymentMethod,
    ) -> BusinessResult<Payment> {
        let offense = OffenseRepo::find_by_id(self.ctx.pool(), offense_id)
            .await?
            .ok_or_else(|| BusinessError::not_found("Offense", offense_id))?;

        match actor.role {
            Role::Officer | Role::Superadmin => {
                if method != PaymentMethod::Cash {
                    return Err(BusinessError::Validation(format!(
                        "Staff may only record Cash payments, not {}",
                        method.as_str()
                    )));
                }
            }
            Role::Driver => {
                if !offense.is_owned_by(&actor.email) {
                    return Err(BusinessError::forbidden(actor.role, "pay another driver's fine"));
                }
                if method == PaymentMethod::Cash {
                    return Err(BusinessError::Validation(
                        "Online payments must use Card or Mobile Money".to_string(),
                    ));
                }
            }
        }

        if offense.status == OffenseStatus::Paid {
            return Err(BusinessError::Conflict(format!(
                "Offense {offense_id} is already paid"
            )));
        }

        let payment = Payment::completed(
            &offense.id,
            &offense.driver_id,
            &offense.driver_name,
            &offense.driver_email,
            &offense.vehicle_number,
            offense.fine,
            method,
        );

        let mut tx = self.ctx.pool().begin().await.map_err(PersistenceError::from)?;
        PaymentRepo::insert(&mut *tx, &payment).await?;
        OffenseRepo::update_status(&mut *tx, offense_id, OffenseStatus::Paid).await?;
        tx.commit().await.map_err(PersistenceError::from)?;

        tracing::info!(
            payment_id = %payment.id,
            offense_id,
            method = method.as_str(),
            amount = %payment.amount,
            "payment recorded"
        );
        Ok(payment)
    }

    /// Role-scoped payment history: drivers see their own, staff see
    /// everything.
    pub async fn list(&self, actor: &User) -> BusinessResult<Vec<Payment>> {
        let payments = match actor.role {
            Role::Driver => {
                PaymentRepo::get_by_driver_email(self.ctx.pool(), &actor.email).await?
            }
            Role::Officer | Role::Superadmin => PaymentRepo::get_all(self.ctx.pool()).await?,
        };
        Ok(payments)
    }

    /// Payments against a single offense, ownership-checked for
    /// drivers.
    pub async fn list_for_offense(
        &self,
        actor: &User,
        offense_id: &str,
    ) -> BusinessResult<Vec<Payment>> {
        let payments = PaymentRepo::get_by_offense(self.ctx.pool(), offense_id).await?;
        if let Some(first) = payments.first() {
            access::ensure_can_view_record(actor, &first.driver_email)?;
        }
        Ok(payments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::offense::{NewOffense, OffenseService};
    use rust_decimal_macros::dec;
    use trafdesk_core::{OffenceType, PaymentStatus};
    use trafdesk_persistence::{init_memory_database, UserRepo};

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

    async fn record_offense(ctx: &ServiceContext, officer: &User, driver_email: &str) -> trafdesk_core::Offense {
        OffenseService::new(ctx)
            .create(
                officer,
                NewOffense {
                    driver_email: driver_email.to_string(),
                    vehicle_number: "KAA-123".to_string(),
                    offence_type: OffenceType::Parking,
                    location: "Lot B".to_string(),
                    date: None,
                    fine: dec!(75.50),
                },
                None,
            )
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_driver_pays_own_fine_by_card() {
        let (ctx, driver, officer, _) = setup().await;
        let offense = record_offense(&ctx, &officer, &driver.email).await;
        let service = PaymentService::new(&ctx);

        let payment = service
            .submit(&driver, &offense.id, PaymentMethod::Card)
            .await
            .unwrap();
        assert_eq!(payment.amount, dec!(75.50));
        assert_eq!(payment.status, PaymentStatus::Completed);

        let stored = OffenseRepo::get_by_id(ctx.pool(), &offense.id).await.unwrap();
        assert_eq!(stored.status, OffenseStatus::Paid);
    }

    #[tokio::test]
    async fn test_driver_cannot_pay_cash() {
        let (ctx, driver, officer, _) = setup().await;
        let offense = record_offense(&ctx, &officer, &driver.email).await;
        let service = PaymentService::new(&ctx);

        let err = service
            .submit(&driver, &offense.id, PaymentMethod::Cash)
            .await
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn test_staff_records_cash_only() {
        let (ctx, driver, officer, admin) = setup().await;
        let offense = record_offense(&ctx, &officer, &driver.email).await;
        let service = PaymentService::new(&ctx);

        let err = service
            .submit(&officer, &offense.id, PaymentMethod::Card)
            .await
            .unwrap_err();
        assert!(err.is_validation());

        let payment = service
            .submit(&admin, &offense.id, PaymentMethod::Cash)
            .await
            .unwrap();
        assert_eq!(payment.method, PaymentMethod::Cash);
    }

    #[tokio::test]
    async fn test_driver_cannot_pay_someone_elses_fine() {
        let (ctx, driver, officer, _) = setup().await;
        let other = User::driver("Yonis Ahmed", "yonis@example.com");
        UserRepo::insert(ctx.pool(), &other).await.unwrap();
        let offense = record_offense(&ctx, &officer, &other.email).await;
        let service = PaymentService::new(&ctx);

        let err = service
            .submit(&driver, &offense.id, PaymentMethod::MobileMoney)
            .await
            .unwrap_err();
        assert!(err.is_forbidden());
    }

    #[tokio::test]
    async fn test_paying_twice_conflicts() {
        let (ctx, driver, officer, _) = setup().await;
        let offense = record_offense(&ctx, &officer, &driver.email).await;
        let service = PaymentService::new(&ctx);

        service
            .submit(&driver, &offense.id, PaymentMethod::MobileMoney)
            .await
            .unwrap();
        let err = service
            .submit(&driver, &offense.id, PaymentMethod::Card)
            .await
            .unwrap_err();
        assert!(err.is_conflict());

        let payments = PaymentRepo::get_by_offense(ctx.pool(), &offense.id).await.unwrap();
        assert_eq!(payments.len(), 1);
    }

    #[tokio::test]
    async fn test_history_is_role_scoped() {
        let (ctx, driver, officer, _) = setup().await;
        let other = User::driver("Yonis Ahmed", "yonis@example.com");
        UserRepo::insert(ctx.pool(), &other).await.unwrap();
        let first = record_offense(&ctx, &officer, &driver.email).await;
        let second = record_offense(&ctx, &officer, &other.email).await;
        let service = PaymentService::new(&ctx);

        service.submit(&driver, &first.id, PaymentMethod::Card).await.unwrap();
        service.submit(&other, &second.id, PaymentMethod::MobileMoney).await.unwrap();

        assert_eq!(service.list(&officer).await.unwrap().len(), 2);
        let own = service.list(&driver).await.unwrap();
        assert_eq!(own.len(), 1);
        assert_eq!(own[0].driver_email, driver.email);

        let err = service.list_for_offense(&driver, &second.id).await.unwrap_err();
        assert!(err.is_forbidden());
    }
}
