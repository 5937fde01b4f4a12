//! Orders
//!
//! Customer order requests and the pickup verification workflow. Orders are
//! never deleted; completed and cancelled records remain as an audit trail,
//! and a completed order carries its proof-of-pickup signature as immutable
//! evidence of handoff.

pub mod data;
pub mod errors;
pub mod records;
mod repository;
pub mod service;

pub use errors::OrdersServiceError;
pub use service::*;
