//! Membership accounts
//!
//! Status and tier types for a customer's loyalty enrollment. A tier is a
//! named bucket of benefits: a discount percentage and a points multiplier
//! applied when earning points on purchases.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Minor currency units that earn one base point before the tier multiplier.
const MINOR_UNITS_PER_POINT: u64 = 100;

/// Errors related to membership status or tier decoding.
#[derive(Debug, Error)]
pub enum MembershipError {
    /// The stored status string is not one of the known variants.
    #[error("unknown membership status: {0}")]
    UnknownStatus(String),

    /// The stored tier string is not one of the known variants.
    #[error("unknown membership tier: {0}")]
    UnknownTier(String),
}

/// Lifecycle status of a membership account.
///
/// Accounts are archived by moving to `Inactive`, never hard-deleted once
/// they carry ledger history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MembershipStatus {
    /// Enrolled and earning.
    Active,
    /// Archived; retained for ledger history.
    Inactive,
    /// Temporarily barred from earning or redeeming.
    Suspended,
}

impl MembershipStatus {
    /// The storage representation of this status.
    pub fn as_str(self) -> &'static str {
        match self {
            MembershipStatus::Active => "active",
            MembershipStatus::Inactive => "inactive",
            MembershipStatus::Suspended => "suspended",
        }
    }
}

impl FromStr for MembershipStatus {
    type Err = MembershipError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "active" => Ok(MembershipStatus::Active),
            "inactive" => Ok(MembershipStatus::Inactive),
            "suspended" => Ok(MembershipStatus::Suspended),
            other => Err(MembershipError::UnknownStatus(other.to_string())),
        }
    }
}

/// A membership tier and its benefits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Entry tier.
    Bronze,
    /// Mid tier.
    Silver,
    /// Top tier.
    Gold,
}

impl Tier {
    /// The storage representation of this tier.
    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Bronze => "bronze",
            Tier::Silver => "silver",
            Tier::Gold => "gold",
        }
    }

    /// Percentage discount applied to purchases at this tier.
    pub fn discount_percent(self) -> u8 {
        match self {
            Tier::Bronze => 5,
            Tier::Silver => 10,
            Tier::Gold => 15,
        }
    }

    /// Multiplier applied to base points earned on purchases.
    pub fn points_multiplier(self) -> u32 {
        match self {
            Tier::Bronze => 1,
            Tier::Silver => 2,
            Tier::Gold => 3,
        }
    }

    /// Points earned for a purchase of `spend_minor` minor currency units.
    ///
    /// One base point per whole hundred minor units, times the tier
    /// multiplier. Remainders below a point do not accrue.
    pub fn points_for_purchase(self, spend_minor: u64) -> u64 {
        (spend_minor / MINOR_UNITS_PER_POINT) * u64::from(self.points_multiplier())
    }
}

impl FromStr for Tier {
    type Err = MembershipError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "bronze" => Ok(Tier::Bronze),
            "silver" => Ok(Tier::Silver),
            "gold" => Ok(Tier::Gold),
            other => Err(MembershipError::UnknownTier(other.to_string())),
        }
    }
}
