//! Message templates for customer notifications.

/// Confirmation sent when an order request is received.
#[must_use]
pub fn order_confirmation(customer_name: &str, medicine_name: &str, quantity: i32) -> String {
    format!(
        "Hi {customer_name}, we received your order for {quantity}x {medicine_name}. \
         We'll notify you when it's ready for pickup."
    )
}

/// Pickup notification sent when an order becomes ready.
#[must_use]
pub fn order_ready(customer_name: &str, medicine_name: &str) -> String {
    format!(
        "Hi {customer_name}, your order for {medicine_name} is ready for pickup. Thank you!"
    )
}

/// Receipt sent when a customer is enrolled into the membership programme.
#[must_use]
pub fn membership_enrolled(customer_name: &str, code: &str, tier: &str) -> String {
    format!(
        "Hi {customer_name}, your {tier} membership {code} is active. \
         Enjoy exclusive discounts and points on every purchase!"
    )
}
