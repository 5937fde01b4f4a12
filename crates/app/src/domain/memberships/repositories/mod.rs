//! Membership Repositories

mod ledger;
mod memberships;

pub(crate) use ledger::PgLedgerRepository;
pub(crate) use memberships::PgMembershipsRepository;
