//! Command handlers

pub mod audit;
pub mod deletion;
pub mod offense;
pub mod payment;
pub mod stats;
pub mod user;
