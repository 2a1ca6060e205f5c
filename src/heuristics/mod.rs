// src/heuristics/mod.rs

mod order;

use serde::Deserialize;
use serde::Serialize;

/// Marker phrases that tag an inbound body as an order notification.
/// Each pairs a label with a glyph so that casual chat containing plain
/// words like "Email" does not match.
pub const ORDER_MARKERS: [&str; 8] = [
    "🛒 New Order Received",
    "👤 First Name",
    "📧 Email",
    "📍 Location",
    "🛍️ Cart Items",
    "💳 Payment Method",
    "💰 Total Price",
    "🆔 Order ID",
];

/// How many markers a body must contain to classify as an order. Real
/// notifications omit optional fields, so requiring all eight would lose
/// orders; fewer than three matches unrelated chatter too often.
pub const MARKER_THRESHOLD: usize = 3;

/// The structured order parsed out of a notification body.
///
/// Values stay opaque strings. Totals and prices are never parsed into
/// numbers here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub order_id: String,
    pub first_name: String,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub location: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub phone1: Option<String>,
    pub phone2: Option<String>,
    pub payment_method: Option<String>,
    pub shipping_fees: Option<String>,
    pub promo_code: Option<String>,
    pub total_price: Option<String>,
    pub user_id: Option<String>,
    /// Cart line items in source order; may be empty.
    pub items: Vec<String>,
}

impl OrderRecord {
    /// How many of the optional scalar fields were present (out of 12).
    pub fn coverage(&self) -> (usize, usize) {
        let total = 12;
        let filled = [
            self.last_name.is_some(),
            self.email.is_some(),
            self.location.is_some(),
            self.street.is_some(),
            self.city.is_some(),
            self.phone1.is_some(),
            self.phone2.is_some(),
            self.payment_method.is_some(),
            self.shipping_fees.is_some(),
            self.promo_code.is_some(),
            self.total_price.is_some(),
            self.user_id.is_some(),
        ]
        .iter()
        .filter(|&&present| present)
        .count();
        (filled, total)
    }
}

/// Classify a normalized message body as an order notification.
pub fn is_order(content: &str) -> bool {
    order::classify(content)
}

/// Parse a normalized message body into an `OrderRecord`, or `None` when
/// either mandatory field is missing or blank.
pub fn extract_order(content: &str) -> Option<OrderRecord> {
    order::extract(content)
}
