//! Audit log writer
//!
//! Appends one entry per sensitive action. The insert runs on the
//! caller's executor, which for every mutating service is the open
//! transaction of that mutation: if the audit write fails, the whole
//! transaction rolls back and the caller sees the operation as failed.
//! Entries are never updated or deleted.

use crate::access::{self, Action};
use crate::error::BusinessResult;
use crate::services::ServiceContext;
use sqlx::Sqlite;
use trafdesk_core::{AuditAction, AuditLogEntry, User};
use trafdesk_persistence::AuditLogRepo;

/// Append one audit entry for a sensitive action.
pub async fn record<'e, E>(
    executor: E,
    user_id: &str,
    action: AuditAction,
    details: serde_json::Value,
    ip_address: Option<&str>,
) -> BusinessResult<AuditLogEntry>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let entry = AuditLogEntry::new(user_id, action, details, ip_address);
    AuditLogRepo::insert(executor, &entry).await?;
    tracing::debug!(action = %action, user_id, "audit entry recorded");
    Ok(entry)
}

/// Most recent audit entries, newest first. Superadmin only.
pub async fn list_recent(
    ctx: &ServiceContext,
    actor: &User,
    limit: i64,
) -> BusinessResult<Vec<AuditLogEntry>> {
    access::ensure(actor, Action::ViewAuditLog)?;
    Ok(AuditLogRepo::list_recent(ctx.pool(), limit).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use trafdesk_persistence::init_memory_database;

    #[tokio::test]
    async fn test_record_appends_entry() {
        let pool = init_memory_database().await.unwrap();
        let entry = record(
            &pool,
            "u-1",
            AuditAction::OffenseCreated,
            json!({"offenseId": "off-1"}),
            Some("192.168.1.9"),
        )
        .await
        .unwrap();

        assert_eq!(entry.action, AuditAction::OffenseCreated);
        let count = AuditLogRepo::count_by_action(&pool, "OFFENSE_CREATED")
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_failed_audit_write_aborts_transaction() {
        let pool = init_memory_database().await.unwrap();

        let mut tx = pool.begin().await.unwrap();
        record(
            &mut *tx,
            "u-1",
            AuditAction::OffenseDeleted,
            json!({"offenseId": "off-1"}),
            None,
        )
        .await
        .unwrap();
        // Dropping without commit rolls back the append
        drop(tx);

        let count = AuditLogRepo::count_by_action(&pool, "OFFENSE_DELETED")
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_list_recent_is_superadmin_only() {
        let pool = init_memory_database().await.unwrap();
        let ctx = ServiceContext::new(pool);
        let admin = User::superadmin("Root", "root@trafdesk.local");
        let officer = User::officer("Hodan Ali", "hodan@police.gov");

        record(
            ctx.pool(),
            &admin.id,
            AuditAction::OffenseCreated,
            json!({"offenseId": "off-1"}),
            None,
        )
        .await
        .unwrap();

        let entries = list_recent(&ctx, &admin, 10).await.unwrap();
        assert_eq!(entries.len(), 1);

        let err = list_recent(&ctx, &officer, 10).await.unwrap_err();
        assert!(err.is_forbidden());
    }
}
