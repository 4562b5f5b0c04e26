//! Checkout: submit the cart as orders.
//!
//! Every cart line becomes one row in the `orders` table carrying the
//! customer's contact details. The cart is cleared only after the backend
//! accepted all rows, so a failed submission can simply be retried.

use chrono::NaiveDate;
use thiserror::Error;
use tracing::{info, instrument};

use delicious_bakers_core::{CartItem, Email, OrderRequest};

use super::non_blank;
use crate::cart::CartStore;
use crate::notify::{Notification, Notifier};
use crate::supabase::{SupabaseClient, SupabaseError};

/// Errors that can occur at checkout.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Nothing to order.
    #[error("Your cart is empty")]
    EmptyCart,

    /// A required form field is blank.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// The backend rejected the order.
    #[error("Failed to submit order: {0}")]
    Supabase(#[from] SupabaseError),
}

/// Customer details collected at checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderForm {
    pub name: String,
    pub email: Email,
    pub phone: String,
    pub delivery_date: NaiveDate,
    pub special_requests: Option<String>,
}

impl OrderForm {
    /// # Errors
    ///
    /// Returns `CheckoutError::MissingField` if the name or phone is blank.
    pub fn validate(&self) -> Result<(), CheckoutError> {
        if non_blank(&self.name).is_none() {
            return Err(CheckoutError::MissingField("name"));
        }
        if non_blank(&self.phone).is_none() {
            return Err(CheckoutError::MissingField("phone"));
        }
        Ok(())
    }
}

/// One order row per cart line, in cart order.
#[must_use]
pub fn order_rows(items: &[CartItem], form: &OrderForm) -> Vec<OrderRequest> {
    let special_requests = form
        .special_requests
        .as_deref()
        .and_then(non_blank)
        .map(str::to_owned);

    items
        .iter()
        .map(|item| OrderRequest {
            name: form.name.trim().to_owned(),
            email: form.email.clone(),
            phone: form.phone.trim().to_owned(),
            product: item.name.clone(),
            quantity: item.quantity,
            delivery_date: form.delivery_date,
            special_requests: special_requests.clone(),
        })
        .collect()
}

/// Submit the cart as orders, then empty it.
///
/// Returns the rows that were submitted.
///
/// # Errors
///
/// Returns `CheckoutError::EmptyCart` for an empty cart, a validation error
/// for an incomplete form, or the backend error if submission fails. The
/// cart is untouched on error.
#[instrument(skip_all, fields(customer = %form.email))]
pub async fn place_order(
    cart: &CartStore,
    client: &SupabaseClient,
    notifier: &dyn Notifier,
    form: &OrderForm,
) -> Result<Vec<OrderRequest>, CheckoutError> {
    let items = cart.items();
    if items.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }
    form.validate()?;

    let rows = order_rows(&items, form);
    client.insert_orders(&rows).await?;
    info!(rows = rows.len(), "Order submitted");

    cart.clear_cart();
    notifier.notify(&Notification::order_submitted());

    Ok(rows)
}
