//! # Trafdesk Reports
//!
//! Statistics and export formats for the dashboards.
//!
//! ## Exporters
//!
//! - [`CsvExporter`] - CSV with proper escaping
//! - [`JsonExporter`] - JSON (pretty or compact)
//!
//! ## Reports
//!
//! - [`OffenseStats`] - offense counts by type, status and month
//! - [`PaymentStats`] - collections, today's take, outstanding fines
//! - [`DeletionQueueStats`] - deletion request counts by status

pub mod exporters;
pub mod stats;

pub use exporters::{CsvExporter, JsonExporter, ReportData, ReportExporter};
pub use stats::{DeletionQueueStats, OffenseStats, PaymentStats};
