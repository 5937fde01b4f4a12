//! Membership Records

use apothecary::{ledger::EntryType, membership::MembershipStatus, membership::Tier};
use jiff::Timestamp;
use uuid::Uuid;

use crate::{domain::customers::records::CustomerUuid, uuids::TypedUuid};

/// Membership UUID
pub type MembershipUuid = TypedUuid<MembershipRecord>;

/// Membership Record
#[derive(Debug, Clone)]
pub struct MembershipRecord {
    /// Unique membership identifier.
    pub uuid: MembershipUuid,

    /// Owning customer; at most one membership per customer.
    pub customer_uuid: CustomerUuid,

    /// Human-facing membership code (`MEM-NNNNNN`).
    pub code: String,

    /// Assigned benefits tier.
    pub tier: Tier,

    /// Cached running balance, derived from the ledger.
    pub points_balance: i64,

    /// Account lifecycle status.
    pub status: MembershipStatus,

    /// Enrollment timestamp.
    pub created_at: Timestamp,

    /// Last update timestamp.
    pub updated_at: Timestamp,
}

/// Ledger Entry UUID
pub type LedgerEntryUuid = TypedUuid<LedgerEntryRecord>;

/// Ledger Entry Record
///
/// Append-only: entries are never updated or deleted once written.
#[derive(Debug, Clone)]
pub struct LedgerEntryRecord {
    /// Unique entry identifier.
    pub uuid: LedgerEntryUuid,

    /// Owning membership.
    pub membership_uuid: MembershipUuid,

    /// Kind of point movement.
    pub entry_type: EntryType,

    /// Unsigned points magnitude; the sign is implied by `entry_type`.
    pub points: i64,

    /// Optional free-text description.
    pub description: Option<String>,

    /// Weak reference to the order that produced this entry, if any.
    pub order_uuid: Option<Uuid>,

    /// Entry timestamp; insertion order is chronological order.
    pub created_at: Timestamp,
}
