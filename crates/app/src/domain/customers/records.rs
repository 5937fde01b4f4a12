//! Customer Records

use jiff::Timestamp;

use crate::uuids::TypedUuid;

/// Customer UUID
pub type CustomerUuid = TypedUuid<CustomerRecord>;

/// Customer Record
///
/// Identity snapshot for a pharmacy customer. Authentication is an external
/// collaborator; the caller's identity is trusted as supplied.
#[derive(Debug, Clone)]
pub struct CustomerRecord {
    /// Unique customer identifier.
    pub uuid: CustomerUuid,

    /// Customer display name.
    pub full_name: String,

    /// Contact email, unique per customer.
    pub email: String,

    /// Contact phone, if provided.
    pub phone: Option<String>,

    /// Postal address, if provided.
    pub address: Option<String>,

    /// Row creation timestamp.
    pub created_at: Timestamp,

    /// Last update timestamp.
    pub updated_at: Timestamp,
}
