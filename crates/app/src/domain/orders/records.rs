//! Order Records

use apothecary::orders::OrderStatus;
use jiff::Timestamp;

use crate::uuids::TypedUuid;

/// Order UUID
pub type OrderUuid = TypedUuid<OrderRecord>;

/// Order Record
///
/// Customer contact details are a denormalised snapshot taken at order time;
/// later profile edits do not rewrite submitted orders.
#[derive(Debug, Clone)]
pub struct OrderRecord {
    /// Unique order identifier.
    pub uuid: OrderUuid,

    /// Human-typable code the customer presents at pickup.
    pub pickup_code: String,

    /// Customer name at order time.
    pub customer_name: String,

    /// Customer phone at order time.
    pub customer_phone: String,

    /// Customer email at order time, if provided.
    pub customer_email: Option<String>,

    /// Requested medicine.
    pub medicine_name: String,

    /// Requested quantity, always positive.
    pub quantity: i32,

    /// Free-text customer notes.
    pub notes: Option<String>,

    /// Lifecycle status.
    pub status: OrderStatus,

    /// Captured proof-of-pickup payload, once a signature has been taken.
    pub customer_signature: Option<String>,

    /// Submission timestamp.
    pub created_at: Timestamp,

    /// Last update timestamp.
    pub updated_at: Timestamp,
}

impl OrderRecord {
    /// Whether proof-of-pickup has been captured.
    pub fn has_signature(&self) -> bool {
        self.customer_signature.is_some()
    }
}
