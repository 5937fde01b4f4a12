//! Test Helpers

use crate::domain::orders::{data::NewOrder, records::OrderUuid};

/// A well-formed order request for a walk-in customer.
pub(crate) fn new_order() -> NewOrder {
    NewOrder {
        uuid: OrderUuid::new(),
        customer_name: "Asha Patel".to_string(),
        customer_phone: "+919876543210".to_string(),
        customer_email: Some("asha@example.com".to_string()),
        medicine_name: "Paracetamol 500mg".to_string(),
        quantity: 2,
        notes: None,
    }
}
