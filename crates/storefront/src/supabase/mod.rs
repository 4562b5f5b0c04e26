//! Client for the hosted catalog, order and image storage backend.
//!
//! # Architecture
//!
//! - Supabase project: PostgREST tables under `/rest/v1`, object storage
//!   under `/storage/v1`
//! - Backend is source of truth for products - NO local sync, direct API calls
//! - In-memory caching via `moka` for catalog reads (5 minute TTL)
//!
//! # Tables
//!
//! - `products` - catalog rows ([`Product`](delicious_bakers_core::Product))
//! - `categories` - category names
//! - `orders` - one row per ordered cart line
//! - `messages` - contact form submissions
//!
//! # Example
//!
//! ```rust,ignore
//! use delicious_bakers_storefront::supabase::SupabaseClient;
//!
//! let client = SupabaseClient::new(&config)?;
//! let cakes = client.products_in_category("Cakes").await?;
//! cart.add_to_cart(CartProduct::from(&cakes[0]));
//! ```

mod cache;
mod client;

pub use client::SupabaseClient;

use thiserror::Error;

/// Errors that can occur when talking to the backend.
#[derive(Debug, Error)]
pub enum SupabaseError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by the backend.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// The API key cannot be sent as a header.
    #[error("Invalid API key: {0}")]
    InvalidKey(String),
}
