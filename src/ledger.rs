//! Points ledger
//!
//! The ledger is an append-only chronological log of point movements and is
//! the source of truth for a membership balance. A cached balance is a
//! derived value; it can always be rebuilt with [`balance`].

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors related to ledger entry construction or decoding.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Entry points must be strictly positive; the sign is implied by the
    /// entry type and never stored.
    #[error("ledger entry points must be greater than zero")]
    NonPositivePoints,

    /// The stored entry type string is not one of the known variants.
    #[error("unknown ledger entry type: {0}")]
    UnknownEntryType(String),
}

/// The kind of point movement a ledger entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryType {
    /// Points credited to the account.
    Earned,
    /// Points spent by the customer.
    Redeemed,
    /// Points removed by an expiry sweep.
    Expired,
}

impl EntryType {
    /// The storage representation of this entry type.
    pub fn as_str(self) -> &'static str {
        match self {
            EntryType::Earned => "EARNED",
            EntryType::Redeemed => "REDEEMED",
            EntryType::Expired => "EXPIRED",
        }
    }

    /// The signed balance delta contributed by an entry of this type.
    pub fn signed_delta(self, points: u32) -> i64 {
        match self {
            EntryType::Earned => i64::from(points),
            EntryType::Redeemed | EntryType::Expired => -i64::from(points),
        }
    }
}

impl FromStr for EntryType {
    type Err = LedgerError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "EARNED" => Ok(EntryType::Earned),
            "REDEEMED" => Ok(EntryType::Redeemed),
            "EXPIRED" => Ok(EntryType::Expired),
            other => Err(LedgerError::UnknownEntryType(other.to_string())),
        }
    }
}

/// A single immutable point movement.
///
/// Entries are never updated or deleted once written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entry {
    entry_type: EntryType,
    points: u32,
}

impl Entry {
    /// Creates a new entry.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::NonPositivePoints`] if `points` is zero.
    pub fn new(entry_type: EntryType, points: u32) -> Result<Self, LedgerError> {
        if points == 0 {
            return Err(LedgerError::NonPositivePoints);
        }

        Ok(Self { entry_type, points })
    }

    /// The entry type.
    pub fn entry_type(&self) -> EntryType {
        self.entry_type
    }

    /// The unsigned points magnitude.
    pub fn points(&self) -> u32 {
        self.points
    }

    /// The signed balance delta of this entry.
    pub fn signed_delta(&self) -> i64 {
        self.entry_type.signed_delta(self.points)
    }
}

/// Reconstructs a balance from ledger entries in any order.
pub fn balance<'a, I>(entries: I) -> i64
where
    I: IntoIterator<Item = &'a Entry>,
{
    entries.into_iter().map(Entry::signed_delta).sum()
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn entry_rejects_zero_points() {
        let result = Entry::new(EntryType::Earned, 0);

        assert!(matches!(result, Err(LedgerError::NonPositivePoints)));
    }

    #[test]
    fn earned_delta_is_positive() -> TestResult {
        let entry = Entry::new(EntryType::Earned, 500)?;

        assert_eq!(entry.signed_delta(), 500);

        Ok(())
    }

    #[test]
    fn redeemed_and_expired_deltas_are_negative() -> TestResult {
        let redeemed = Entry::new(EntryType::Redeemed, 200)?;
        let expired = Entry::new(EntryType::Expired, 50)?;

        assert_eq!(redeemed.signed_delta(), -200);
        assert_eq!(expired.signed_delta(), -50);

        Ok(())
    }

    #[test]
    fn balance_is_sum_of_signed_deltas() -> TestResult {
        let entries = [
            Entry::new(EntryType::Earned, 500)?,
            Entry::new(EntryType::Redeemed, 200)?,
            Entry::new(EntryType::Earned, 100)?,
            Entry::new(EntryType::Expired, 50)?,
        ];

        assert_eq!(balance(&entries), 350);

        Ok(())
    }

    #[test]
    fn balance_of_no_entries_is_zero() {
        assert_eq!(balance([].iter()), 0);
    }

    #[test]
    fn entry_type_round_trips_through_storage_form() -> TestResult {
        for entry_type in [EntryType::Earned, EntryType::Redeemed, EntryType::Expired] {
            assert_eq!(entry_type.as_str().parse::<EntryType>()?, entry_type);
        }

        Ok(())
    }

    #[test]
    fn unknown_entry_type_is_rejected() {
        let result = "SPENT".parse::<EntryType>();

        assert!(matches!(result, Err(LedgerError::UnknownEntryType(_))));
    }
}
