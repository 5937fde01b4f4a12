//! Customer Data

use crate::domain::customers::records::CustomerUuid;

/// New Customer Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewCustomer {
    /// UUID to assign to the customer row.
    pub uuid: CustomerUuid,

    /// Customer display name.
    pub full_name: String,

    /// Contact email.
    pub email: String,

    /// Contact phone, if provided.
    pub phone: Option<String>,

    /// Postal address, if provided.
    pub address: Option<String>,
}
