//! Memberships
//!
//! Loyalty enrollment accounts and their append-only points ledger. The
//! ledger is the source of truth; the cached balance column is only ever
//! written in the same transaction as a ledger append.

pub mod data;
pub mod errors;
pub mod records;
mod repositories;
pub mod service;

pub use errors::MembershipsServiceError;
pub use service::*;
