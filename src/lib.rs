//! Apothecary
//!
//! Apothecary is the domain core of a pharmacy operations backend: a loyalty
//! points ledger, the order pickup verification state machine, membership
//! tiers and human-typable code generation. It performs no I/O; persistence
//! lives in the `apothecary-app` crate.

pub mod codes;
pub mod ledger;
pub mod membership;
pub mod orders;
pub mod prelude;
