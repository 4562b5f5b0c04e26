//! Payloads written to the `orders` and `messages` tables.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::email::Email;

/// One order row: a single product and quantity for one customer.
///
/// A checkout with several cart lines produces one row per line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub name: String,
    pub email: Email,
    pub phone: String,
    /// Product display name as it appeared in the cart.
    pub product: String,
    pub quantity: u32,
    pub delivery_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special_requests: Option<String>,
}

/// A message submitted through the contact form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactMessage {
    pub name: String,
    pub email: Email,
    pub subject: String,
    pub message: String,
}
