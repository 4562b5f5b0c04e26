//! Unified error handling.
//!
//! Provides a unified `AppError` type wrapping every module's errors.
//! Front ends should show [`AppError::user_message`] and log the full error.

use thiserror::Error;

use crate::cart::PersistError;
use crate::config::ConfigError;
use crate::services::admin::AdminError;
use crate::services::checkout::CheckoutError;
use crate::services::contact::ContactError;
use crate::storage::StorageError;
use crate::supabase::SupabaseError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Local storage could not be opened.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// The cart could not be saved.
    #[error("Cart error: {0}")]
    Persist(#[from] PersistError),

    /// Backend operation failed.
    #[error("Backend error: {0}")]
    Supabase(#[from] SupabaseError),

    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    #[error("Contact error: {0}")]
    Contact(#[from] ContactError),

    #[error("Admin error: {0}")]
    Admin(#[from] AdminError),

    /// A command needs the backend but none was configured.
    #[error("Backend not configured: set SUPABASE_URL and SUPABASE_ANON_KEY")]
    BackendNotConfigured,

    /// Bad input from the user.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    /// Message safe to show a customer.
    ///
    /// Backend and storage details are replaced by a generic message; input
    /// problems are shown as-is.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Supabase(SupabaseError::RateLimited(secs)) => {
                format!("Too many requests, please try again in {secs} seconds.")
            }
            Self::Supabase(SupabaseError::NotFound(what)) => what.clone(),
            Self::Supabase(_)
            | Self::Storage(_)
            | Self::Persist(_)
            | Self::Checkout(CheckoutError::Supabase(_))
            | Self::Contact(ContactError::Supabase(_))
            | Self::Admin(AdminError::Supabase(_)) => {
                "Something went wrong. Please try again.".to_string()
            }
            _ => self.to_string(),
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
