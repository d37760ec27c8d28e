//! # Trafdesk Persistence
//!
//! SQLite persistence layer for the traffic-offense system.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                       Database                           │
//! │  ┌──────────────┐   ┌──────────────┐   ┌─────────────┐  │
//! │  │    SQLite    │   │  migrations  │   │    Repos    │  │
//! │  │   (state)    │   │   (schema)   │   │  (queries)  │  │
//! │  └──────────────┘   └──────────────┘   └─────────────┘  │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! The two state transitions the deletion workflow depends on are
//! conditional UPDATEs here (flag 0 -> 1, status pending -> terminal),
//! backed by a partial unique index, so the at-most-one-pending and
//! single-shot-resolution invariants hold under concurrent callers
//! without application-level locking.

pub mod error;
pub mod sqlite;

pub use error::{PersistenceError, PersistenceResult};
pub use sqlite::{
    create_pool, init_database, init_memory_database, run_migrations, AuditLogRepo,
    DeletionRequestRepo, OffenseRepo, PaymentRepo, UserRepo,
};
pub use sqlite::schema::{AuditLogRow, DeletionRequestRow, OffenseRow, PaymentRow, UserRow};
