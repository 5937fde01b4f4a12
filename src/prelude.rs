//! Apothecary prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    codes::{membership_code, normalize, pickup_code},
    ledger::{Entry, EntryType, LedgerError, balance},
    membership::{MembershipError, MembershipStatus, Tier},
    orders::{OrderStateError, OrderStatus, Signature, SignatureError},
};
