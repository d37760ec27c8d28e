//! SQLite persistence module
//!
//! Repository pattern for SQLite database access.

pub mod repos;
pub mod schema;

pub use repos::{
    create_pool, init_database, init_memory_database, run_migrations, AuditLogRepo,
    DeletionRequestRepo, OffenseRepo, PaymentRepo, UserRepo,
};
pub use schema::{AuditLogRow, DeletionRequestRow, OffenseRow, PaymentRow, UserRow};
