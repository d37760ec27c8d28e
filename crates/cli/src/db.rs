//! Database initialization, status, and acting-user resolution

use anyhow::{Context, Result};
use sqlx::SqlitePool;
use std::path::Path;
use trafdesk_business::BusinessError;
use trafdesk_core::User;
use trafdesk_persistence::{self as persistence, UserRepo};

/// Initialize the database with schema and a first superadmin
pub async fn init(db_path: &Path, force: bool) -> Result<()> {
    if force && db_path.exists() {
        std::fs::remove_file(db_path).context("Failed to remove existing database")?;
        println!("🗑️  Removed existing database");
    }

    let db_url = format!("sqlite:{}?mode=rwc", db_path.display());
    let pool = persistence::init_database(&db_url)
        .await
        .context("Failed to initialize database")?;

    seed(&pool).await?;

    pool.close().await;
    Ok(())
}

/// Seed the first superadmin so the resolve queue has an owner
async fn seed(pool: &SqlitePool) -> Result<()> {
    if UserRepo::get_by_email(pool, "root@trafdesk.local").await?.is_some() {
        return Ok(());
    }
    let root = User::superadmin("Root", "root@trafdesk.local");
    UserRepo::insert(pool, &root).await?;
    println!("🌱 Seeded superadmin root@trafdesk.local");
    Ok(())
}

/// Show database status
pub async fn show_status(db_path: &Path) -> Result<()> {
    if !db_path.exists() {
        println!("❌ Database not found at {:?}", db_path);
        println!("   Run 'trafdesk init' to create the database");
        return Ok(());
    }

    let pool = connect(db_path).await?;

    println!("📊 Database Status");
    println!("   Path: {:?}", db_path);
    println!();

    let users: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
        .fetch_one(&pool)
        .await
        .unwrap_or((0,));
    let offenses: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM offenses")
        .fetch_one(&pool)
        .await
        .unwrap_or((0,));
    let requests: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM deletion_requests")
        .fetch_one(&pool)
        .await
        .unwrap_or((0,));
    let payments: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM payments")
        .fetch_one(&pool)
        .await
        .unwrap_or((0,));
    let audit: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM audit_log")
        .fetch_one(&pool)
        .await
        .unwrap_or((0,));

    println!("   Users:             {}", users.0);
    println!("   Offenses:          {}", offenses.0);
    println!("   Deletion requests: {}", requests.0);
    println!("   Payments:          {}", payments.0);
    println!("   Audit entries:     {}", audit.0);

    pool.close().await;
    Ok(())
}

/// Connect to an existing database
pub async fn connect(db_path: &Path) -> Result<SqlitePool> {
    let db_url = format!("sqlite:{}", db_path.display());
    persistence::create_pool(&db_url)
        .await
        .context("Failed to connect to database. Run 'trafdesk init' first.")
}

/// Resolve the `--as` email to a registered user.
///
/// An unresolvable identity is Unauthenticated, before any policy
/// check runs.
pub async fn resolve_actor(pool: &SqlitePool, acting_as: Option<&str>) -> Result<User> {
    let Some(email) = acting_as else {
        return Err(BusinessError::Unauthenticated(
            "this command acts as a user; pass --as <email>".to_string(),
        )
        .into());
    };
    match UserRepo::get_by_email(pool, email).await? {
        Some(user) => Ok(user),
        None => Err(BusinessError::Unauthenticated(format!(
            "no registered user with email '{email}'"
        ))
        .into()),
    }
}
