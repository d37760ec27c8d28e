//! # Trafdesk Core
//!
//! Core domain types for the traffic-offense management system:
//! users and roles, offenses, deletion requests, payments, and the
//! audit log vocabulary. Pure data with validation - no I/O.

pub mod audit;
pub mod deletion;
pub mod error;
pub mod offense;
pub mod payment;
pub mod role;

pub use audit::{AuditAction, AuditLogEntry};
pub use deletion::{Decision, DeletionRequest, OffenseSnapshot, RequestStatus};
pub use error::{CoreError, CoreResult};
pub use offense::{OffenceType, Offense, OffenseStatus};
pub use payment::{Payment, PaymentMethod, PaymentStatus};
pub use role::{Role, User};
