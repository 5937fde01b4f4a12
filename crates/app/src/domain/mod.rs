//! Apothecary Domain Concerns

pub mod customers;
pub mod memberships;
pub mod orders;
