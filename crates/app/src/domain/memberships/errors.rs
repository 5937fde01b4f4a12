//! Memberships service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

/// Unique constraint guarding one membership per customer.
const CUSTOMER_UNIQUE_CONSTRAINT: &str = "memberships_customer_uuid_key";

/// Unique constraint on the human-facing membership code.
const CODE_UNIQUE_CONSTRAINT: &str = "memberships_code_key";

/// Foreign key from memberships to customers.
const CUSTOMER_FK_CONSTRAINT: &str = "memberships_customer_uuid_fkey";

/// Foreign key from ledger entries to memberships. Raised both by an append
/// for a missing membership and by deleting a membership that has entries;
/// only the deleting caller can tell the two apart.
pub(crate) const LEDGER_FK_CONSTRAINT: &str = "ledger_entries_membership_uuid_fkey";

#[derive(Debug, Error)]
pub enum MembershipsServiceError {
    #[error("this customer already has a membership")]
    AlreadyEnrolled,

    #[error("generated membership code collided with an existing one")]
    CodeTaken,

    #[error("membership not found")]
    NotFound,

    #[error("customer not found")]
    CustomerNotFound,

    #[error("points must be greater than zero")]
    InvalidPoints,

    #[error("only earned and redeemed adjustments are accepted")]
    UnsupportedEntryType,

    #[error("insufficient points balance")]
    InsufficientBalance,

    #[error("membership has ledger history and cannot be deleted; archive it instead")]
    HasLedgerHistory,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for MembershipsServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        let kind = error.as_database_error().map(DatabaseError::kind);
        let constraint = error
            .as_database_error()
            .and_then(DatabaseError::constraint)
            .map(str::to_owned);

        match kind {
            Some(ErrorKind::UniqueViolation) => match constraint.as_deref() {
                Some(CUSTOMER_UNIQUE_CONSTRAINT) => Self::AlreadyEnrolled,
                Some(CODE_UNIQUE_CONSTRAINT) => Self::CodeTaken,
                _ => Self::Sql(error),
            },
            Some(ErrorKind::ForeignKeyViolation) => match constraint.as_deref() {
                Some(CUSTOMER_FK_CONSTRAINT) => Self::CustomerNotFound,
                // A ledger append referencing a missing membership.
                Some(LEDGER_FK_CONSTRAINT) => Self::NotFound,
                _ => Self::Sql(error),
            },
            Some(ErrorKind::NotNullViolation) => Self::MissingRequiredData,
            Some(ErrorKind::CheckViolation) => Self::InvalidData,
            Some(ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}
