//! Orders service errors.

use apothecary::orders::{OrderStateError, SignatureError};
use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OrdersServiceError {
    #[error("order not found")]
    NotFound,

    #[error("an order with this identifier already exists")]
    AlreadyExists,

    #[error("generated pickup code collided with an existing one")]
    CodeTaken,

    #[error("quantity must be greater than zero")]
    InvalidQuantity,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("order is already completed or cancelled")]
    AlreadyClosed,

    #[error(transparent)]
    SignatureRequired(#[from] SignatureError),

    #[error(transparent)]
    InvalidTransition(#[from] OrderStateError),

    #[error("invalid data")]
    InvalidData,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for OrdersServiceError {
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
                Some("orders_pickup_code_key") => Self::CodeTaken,
                _ => Self::AlreadyExists,
            },
            Some(ErrorKind::NotNullViolation) => Self::MissingRequiredData,
            Some(ErrorKind::CheckViolation) => Self::InvalidData,
            Some(ErrorKind::ForeignKeyViolation | ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}
