//! Repository implementations for SQLite
//!
//! CRUD operations for all tables. Methods take a generic executor so
//! the same query runs against the pool or inside an open transaction;
//! the workflow-critical writes are conditional UPDATEs whose
//! rows_affected result tells the caller whether the state transition
//! actually happened.

use crate::error::{PersistenceError, PersistenceResult};
use crate::sqlite::schema::*;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Sqlite, SqlitePool};
use std::str::FromStr;
use trafdesk_core::{
    AuditLogEntry, DeletionRequest, Offense, OffenseStatus, Payment, PaymentStatus,
    RequestStatus, User,
};

/// Create a connection pool for an existing database
pub async fn create_pool(database_url: &str) -> PersistenceResult<SqlitePool> {
    let pool = SqlitePool::connect(database_url).await?;
    Ok(pool)
}

/// Run migrations
pub async fn run_migrations(pool: &SqlitePool) -> PersistenceResult<()> {
    sqlx::migrate!().run(pool).await?;
    Ok(())
}

/// Create a new database (file created if missing) with schema
pub async fn init_database(database_url: &str) -> PersistenceResult<SqlitePool> {
    let pool = SqlitePool::connect_with(
        database_url
            .parse::<SqliteConnectOptions>()?
            .create_if_missing(true),
    )
    .await?;

    run_migrations(&pool).await?;

    Ok(pool)
}

/// In-memory database with schema, for tests and throwaway runs.
///
/// A single connection, because every `sqlite::memory:` connection is
/// its own database.
pub async fn init_memory_database() -> PersistenceResult<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(SqliteConnectOptions::from_str("sqlite::memory:")?)
        .await?;

    run_migrations(&pool).await?;

    Ok(pool)
}

// ============================================================================
// User Repository
// ============================================================================

/// Repository for the users table
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user
    pub async fn insert<'e, E>(executor: E, user: &User) -> PersistenceResult<()>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        let row = UserRow::from(user);
        sqlx::query(
            "INSERT INTO users (id, name, email, password_hash, role, profile_image, \
             two_factor_enabled, two_factor_secret, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&row.id)
        .bind(&row.name)
        .bind(&row.email)
        .bind(&row.password_hash)
        .bind(&row.role)
        .bind(&row.profile_image)
        .bind(row.two_factor_enabled)
        .bind(&row.two_factor_secret)
        .bind(row.created_at)
        .execute(executor)
        .await?;
        Ok(())
    }

    /// Get a user by ID
    pub async fn get_by_id<'e, E>(executor: E, id: &str) -> PersistenceResult<User>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(executor)
            .await?
            .ok_or_else(|| PersistenceError::not_found("User", id))?
            .try_into()
    }

    /// All users, oldest first
    pub async fn get_all<'e, E>(executor: E) -> PersistenceResult<Vec<User>>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, UserRow>("SELECT * FROM users ORDER BY created_at ASC")
            .fetch_all(executor)
            .await?
            .into_iter()
            .map(User::try_from)
            .collect()
    }

    /// Get a user by email (ownership checks key on it)
    pub async fn get_by_email<'e, E>(executor: E, email: &str) -> PersistenceResult<Option<User>>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(executor)
            .await?
            .map(User::try_from)
            .transpose()
    }
}

// ============================================================================
// Offense Repository
// ============================================================================

/// Repository for the offenses table
pub struct OffenseRepo;

impl OffenseRepo {
    /// Insert a new offense
    pub async fn insert<'e, E>(executor: E, offense: &Offense) -> PersistenceResult<()>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        let row = OffenseRow::from(offense);
        sqlx::query(
            "INSERT INTO offenses (id, driver_name, driver_email, vehicle_number, offence_type, \
             location, date, fine, status, driver_id, deletion_requested, deletion_requested_by, \
             deletion_request_reason, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&row.id)
        .bind(&row.driver_name)
        .bind(&row.driver_email)
        .bind(&row.vehicle_number)
        .bind(&row.offence_type)
        .bind(&row.location)
        .bind(row.date)
        .bind(&row.fine)
        .bind(&row.status)
        .bind(&row.driver_id)
        .bind(row.deletion_requested)
        .bind(&row.deletion_requested_by)
        .bind(&row.deletion_request_reason)
        .bind(row.created_at)
        .execute(executor)
        .await?;
        Ok(())
    }

    /// Get an offense by ID
    pub async fn get_by_id<'e, E>(executor: E, id: &str) -> PersistenceResult<Offense>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        Self::find_by_id(executor, id)
            .await?
            .ok_or_else(|| PersistenceError::not_found("Offense", id))
    }

    /// Get an offense by ID, None if absent
    pub async fn find_by_id<'e, E>(executor: E, id: &str) -> PersistenceResult<Option<Offense>>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, OffenseRow>("SELECT * FROM offenses WHERE id = ?")
            .bind(id)
            .fetch_optional(executor)
            .await?
            .map(Offense::try_from)
            .transpose()
    }

    /// All offenses, newest first
    pub async fn get_all<'e, E>(executor: E) -> PersistenceResult<Vec<Offense>>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        let rows = sqlx::query_as::<_, OffenseRow>("SELECT * FROM offenses ORDER BY date DESC")
            .fetch_all(executor)
            .await?;
        rows.into_iter().map(Offense::try_from).collect()
    }

    /// A driver's offenses, newest first
    pub async fn get_by_driver_email<'e, E>(
        executor: E,
        email: &str,
    ) -> PersistenceResult<Vec<Offense>>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        let rows = sqlx::query_as::<_, OffenseRow>(
            "SELECT * FROM offenses WHERE driver_email = ? ORDER BY date DESC",
        )
        .bind(email)
        .fetch_all(executor)
        .await?;
        rows.into_iter().map(Offense::try_from).collect()
    }

    /// Update the editable fields of an offense
    pub async fn update_fields<'e, E>(executor: E, offense: &Offense) -> PersistenceResult<()>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        let row = OffenseRow::from(offense);
        let result = sqlx::query(
            "UPDATE offenses SET vehicle_number = ?, offence_type = ?, location = ?, \
             date = ?, fine = ? WHERE id = ?",
        )
        .bind(&row.vehicle_number)
        .bind(&row.offence_type)
        .bind(&row.location)
        .bind(row.date)
        .bind(&row.fine)
        .bind(&row.id)
        .execute(executor)
        .await?;

        if result.rows_affected() == 0 {
            return Err(PersistenceError::not_found("Offense", &offense.id));
        }
        Ok(())
    }

    /// Update the payment status
    pub async fn update_status<'e, E>(
        executor: E,
        id: &str,
        status: OffenseStatus,
    ) -> PersistenceResult<()>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("UPDATE offenses SET status = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(id)
            .execute(executor)
            .await?;

        if result.rows_affected() == 0 {
            return Err(PersistenceError::not_found("Offense", id));
        }
        Ok(())
    }

    /// Flag an offense for deletion, only if it is not already flagged.
    ///
    /// Conditional write: returns false when another request already
    /// holds the flag, so two concurrent submissions cannot both
    /// succeed regardless of what either of them read beforehand.
    pub async fn mark_deletion_requested<'e, E>(
        executor: E,
        id: &str,
        requested_by: &str,
        reason: &str,
    ) -> PersistenceResult<bool>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query(
            "UPDATE offenses SET deletion_requested = 1, deletion_requested_by = ?, \
             deletion_request_reason = ? WHERE id = ? AND deletion_requested = 0",
        )
        .bind(requested_by)
        .bind(reason)
        .bind(id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Clear the deletion flag after a request is rejected, making the
    /// offense requestable again.
    pub async fn clear_deletion_requested<'e, E>(executor: E, id: &str) -> PersistenceResult<()>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        sqlx::query(
            "UPDATE offenses SET deletion_requested = 0, deletion_requested_by = NULL, \
             deletion_request_reason = NULL WHERE id = ?",
        )
        .bind(id)
        .execute(executor)
        .await?;
        Ok(())
    }

    /// Permanently remove an offense. Returns false if it was already
    /// gone.
    pub async fn delete<'e, E>(executor: E, id: &str) -> PersistenceResult<bool>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("DELETE FROM offenses WHERE id = ?")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Count offenses in a given status
    pub async fn count_by_status<'e, E>(
        executor: E,
        status: OffenseStatus,
    ) -> PersistenceResult<i64>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM offenses WHERE status = ?")
                .bind(status.as_str())
                .fetch_one(executor)
                .await?;
        Ok(count)
    }
}

// ============================================================================
// Deletion Request Repository
// ============================================================================

/// Repository for the deletion_requests table
pub struct DeletionRequestRepo;

impl DeletionRequestRepo {
    /// Insert a new pending request.
    ///
    /// The partial unique index on `(offense_id) WHERE status =
    /// 'pending'` backs up the offense-flag check; a duplicate pending
    /// request surfaces as a unique violation.
    pub async fn insert<'e, E>(executor: E, request: &DeletionRequest) -> PersistenceResult<()>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        let row = DeletionRequestRow::from(request);
        sqlx::query(
            "INSERT INTO deletion_requests (id, offense_id, requested_by, reason, status, \
             timestamp, snapshot_driver_name, snapshot_vehicle_number, snapshot_offence_type, \
             snapshot_location, snapshot_date, snapshot_fine) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&row.id)
        .bind(&row.offense_id)
        .bind(&row.requested_by)
        .bind(&row.reason)
        .bind(&row.status)
        .bind(row.timestamp)
        .bind(&row.snapshot_driver_name)
        .bind(&row.snapshot_vehicle_number)
        .bind(&row.snapshot_offence_type)
        .bind(&row.snapshot_location)
        .bind(row.snapshot_date)
        .bind(&row.snapshot_fine)
        .execute(executor)
        .await?;
        Ok(())
    }

    /// Get a request by ID
    pub async fn get_by_id<'e, E>(executor: E, id: &str) -> PersistenceResult<DeletionRequest>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, DeletionRequestRow>("SELECT * FROM deletion_requests WHERE id = ?")
            .bind(id)
            .fetch_optional(executor)
            .await?
            .ok_or_else(|| PersistenceError::not_found("DeletionRequest", id))?
            .try_into()
    }

    /// Move a pending request to its terminal status.
    ///
    /// Conditional write: only succeeds while the stored status is
    /// still `pending`, so a second resolution attempt reports false
    /// instead of double-applying.
    pub async fn resolve<'e, E>(
        executor: E,
        id: &str,
        status: RequestStatus,
    ) -> PersistenceResult<bool>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query(
            "UPDATE deletion_requests SET status = ? WHERE id = ? AND status = 'pending'",
        )
        .bind(status.as_str())
        .bind(id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// All requests, newest first
    pub async fn list_all<'e, E>(executor: E) -> PersistenceResult<Vec<DeletionRequest>>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        let rows = sqlx::query_as::<_, DeletionRequestRow>(
            "SELECT * FROM deletion_requests ORDER BY timestamp DESC",
        )
        .fetch_all(executor)
        .await?;
        rows.into_iter().map(DeletionRequest::try_from).collect()
    }

    /// Requests in a given status, newest first
    pub async fn list_by_status<'e, E>(
        executor: E,
        status: RequestStatus,
    ) -> PersistenceResult<Vec<DeletionRequest>>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        let rows = sqlx::query_as::<_, DeletionRequestRow>(
            "SELECT * FROM deletion_requests WHERE status = ? ORDER BY timestamp DESC",
        )
        .bind(status.as_str())
        .fetch_all(executor)
        .await?;
        rows.into_iter().map(DeletionRequest::try_from).collect()
    }

    /// Count requests in a given status
    pub async fn count_by_status<'e, E>(
        executor: E,
        status: RequestStatus,
    ) -> PersistenceResult<i64>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM deletion_requests WHERE status = ?")
                .bind(status.as_str())
                .fetch_one(executor)
                .await?;
        Ok(count)
    }
}

// ============================================================================
// Audit Log Repository
// ============================================================================

/// Repository for the audit_log table (append and read, never update)
pub struct AuditLogRepo;

impl AuditLogRepo {
    /// Append one entry
    pub async fn insert<'e, E>(executor: E, entry: &AuditLogEntry) -> PersistenceResult<()>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        let row = AuditLogRow::try_from(entry)?;
        sqlx::query(
            "INSERT INTO audit_log (id, user_id, action, details, timestamp, ip_address) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&row.id)
        .bind(&row.user_id)
        .bind(&row.action)
        .bind(&row.details)
        .bind(row.timestamp)
        .bind(&row.ip_address)
        .execute(executor)
        .await?;
        Ok(())
    }

    /// Most recent entries, newest first
    pub async fn list_recent<'e, E>(executor: E, limit: i64) -> PersistenceResult<Vec<AuditLogEntry>>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        let rows = sqlx::query_as::<_, AuditLogRow>(
            "SELECT * FROM audit_log ORDER BY timestamp DESC LIMIT ?",
        )
        .bind(limit)
        .fetch_all(executor)
        .await?;
        rows.into_iter().map(AuditLogEntry::try_from).collect()
    }

    /// Count entries with a given action tag
    pub async fn count_by_action<'e, E>(executor: E, action: &str) -> PersistenceResult<i64>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM audit_log WHERE action = ?")
            .bind(action)
            .fetch_one(executor)
            .await?;
        Ok(count)
    }
}

// ============================================================================
// Payment Repository
// ============================================================================

/// Repository for the payments table
pub struct PaymentRepo;

impl PaymentRepo {
    /// Insert a new payment
    pub async fn insert<'e, E>(executor: E, payment: &Payment) -> PersistenceResult<()>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        let row = PaymentRow::from(payment);
        sqlx::query(
            "INSERT INTO payments (id, offense_id, driver_id, driver_name, driver_email, \
             vehicle_number, amount, method, status, date) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&row.id)
        .bind(&row.offense_id)
        .bind(&row.driver_id)
        .bind(&row.driver_name)
        .bind(&row.driver_email)
        .bind(&row.vehicle_number)
        .bind(&row.amount)
        .bind(&row.method)
        .bind(&row.status)
        .bind(row.date)
        .execute(executor)
        .await?;
        Ok(())
    }

    /// All payments, newest first
    pub async fn get_all<'e, E>(executor: E) -> PersistenceResult<Vec<Payment>>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        let rows = sqlx::query_as::<_, PaymentRow>("SELECT * FROM payments ORDER BY date DESC")
            .fetch_all(executor)
            .await?;
        rows.into_iter().map(Payment::try_from).collect()
    }

    /// A driver's payments, newest first
    pub async fn get_by_driver_email<'e, E>(
        executor: E,
        email: &str,
    ) -> PersistenceResult<Vec<Payment>>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        let rows = sqlx::query_as::<_, PaymentRow>(
            "SELECT * FROM payments WHERE driver_email = ? ORDER BY date DESC",
        )
        .bind(email)
        .fetch_all(executor)
        .await?;
        rows.into_iter().map(Payment::try_from).collect()
    }

    /// Payments linked to an offense
    pub async fn get_by_offense<'e, E>(
        executor: E,
        offense_id: &str,
    ) -> PersistenceResult<Vec<Payment>>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        let rows = sqlx::query_as::<_, PaymentRow>(
            "SELECT * FROM payments WHERE offense_id = ? ORDER BY date DESC",
        )
        .bind(offense_id)
        .fetch_all(executor)
        .await?;
        rows.into_iter().map(Payment::try_from).collect()
    }

    /// Move every payment linked to an offense to a new status,
    /// mirroring the offense's Paid/Unpaid flips.
    pub async fn set_status_by_offense<'e, E>(
        executor: E,
        offense_id: &str,
        status: PaymentStatus,
    ) -> PersistenceResult<()>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        sqlx::query("UPDATE payments SET status = ? WHERE offense_id = ?")
            .bind(status.as_str())
            .bind(offense_id)
            .execute(executor)
            .await?;
        Ok(())
    }
}
