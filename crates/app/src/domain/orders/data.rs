//! Order Data

use crate::domain::orders::records::OrderUuid;

/// New Order Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    /// UUID to assign to the order row.
    pub uuid: OrderUuid,

    /// Customer name snapshot.
    pub customer_name: String,

    /// Customer phone snapshot.
    pub customer_phone: String,

    /// Customer email snapshot, if provided.
    pub customer_email: Option<String>,

    /// Requested medicine.
    pub medicine_name: String,

    /// Requested quantity, must be positive.
    pub quantity: u32,

    /// Free-text customer notes.
    pub notes: Option<String>,
}
