//! Business logic for trafdesk
//!
//! Role-gated services over the persistence layer. Every operation
//! takes the acting [`User`](trafdesk_core::User) explicitly; there is
//! no ambient identity. Mutations write their audit entry inside the
//! same database transaction, so an operation whose audit entry cannot
//! be written does not happen.

pub mod access;
pub mod audit;
pub mod deletion;
pub mod error;
pub mod offense;
pub mod payment;
pub mod services;

pub use access::{ensure, ensure_can_request_deletion, ensure_can_view_record, permits, Action};
pub use deletion::{DeletionRequestView, DeletionService};
pub use error::{BusinessError, BusinessResult};
pub use offense::{NewOffense, OffenseService, OffenseUpdate};
pub use payment::PaymentService;
pub use services::ServiceContext;
