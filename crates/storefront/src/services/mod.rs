//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `checkout` - Turn the cart into order rows
//! - `contact` - Contact form messages
//! - `admin` - Adding products with an uploaded image
//!
//! Each service talks to the backend through
//! [`SupabaseClient`](crate::supabase::SupabaseClient) and announces success
//! through a [`Notifier`](crate::notify::Notifier).

pub mod admin;
pub mod checkout;
pub mod contact;

/// Trim `value`, mapping blank input to `None`.
pub(crate) fn non_blank(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}
