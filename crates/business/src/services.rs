//! Service context
//!
//! Shared database access for the business services. Every service
//! method takes the authenticated [`trafdesk_core::User`] as an
//! explicit argument - there is no ambient, request-scoped identity.

use sqlx::SqlitePool;

/// Context for business operations - holds database access.
#[derive(Clone)]
pub struct ServiceContext {
    pool: SqlitePool,
}

impl ServiceContext {
    /// Create a new service context over a connection pool
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get the database pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
