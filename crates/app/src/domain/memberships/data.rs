//! Membership Data

use apothecary::{ledger::EntryType, membership::Tier};
use uuid::Uuid;

use crate::domain::{customers::records::CustomerUuid, memberships::records::MembershipUuid};

/// New Membership Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewMembership {
    /// UUID to assign to the membership row.
    pub uuid: MembershipUuid,

    /// Enrolling customer.
    pub customer_uuid: CustomerUuid,

    /// Benefits tier to assign.
    pub tier: Tier,

    /// Starting balance; when non-zero an `EARNED` "Initial points" ledger
    /// entry is written in the same transaction as the account.
    pub initial_points: u32,
}

/// Points Adjustment Data
#[derive(Debug, Clone, PartialEq)]
pub struct PointsAdjustment {
    /// `Earned` or `Redeemed`; expiry entries are not staff-adjustable.
    pub entry_type: EntryType,

    /// Unsigned points magnitude, must be greater than zero.
    pub points: u32,

    /// Optional free-text description for the ledger entry.
    pub description: Option<String>,

    /// Order that produced this adjustment, if any.
    pub order_uuid: Option<Uuid>,
}
