//! Application state shared by every command.

use std::sync::Arc;

use crate::cart::CartStore;
use crate::config::{CartConfig, SupabaseConfig};
use crate::error::{AppError, Result};
use crate::notify::Notifier;
use crate::storage::{FileStore, LocalStore};
use crate::supabase::SupabaseClient;

/// Application state: the cart, the notification sink and, when configured,
/// the backend client.
///
/// This struct is cheaply cloneable via `Arc`. Everything is wired up in the
/// constructor, so a value of this type always has a hydrated cart.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cart: CartStore,
    notifier: Arc<dyn Notifier>,
    supabase: Option<SupabaseClient>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("cart", &self.inner.cart)
            .field("supabase", &self.inner.supabase)
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Create application state backed by a [`FileStore`].
    ///
    /// # Arguments
    ///
    /// * `cart` - Where the cart is saved
    /// * `supabase` - Backend configuration, if the caller needs the backend
    /// * `notifier` - Sink for customer-facing notifications
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory cannot be created or the
    /// backend client cannot be built.
    pub fn new(
        cart: &CartConfig,
        supabase: Option<&SupabaseConfig>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self> {
        let store: Arc<dyn LocalStore> = Arc::new(FileStore::open(&cart.data_dir)?);
        let client = supabase.map(SupabaseClient::new).transpose()?;
        Ok(Self::with_store(store, &cart.cart_key, client, notifier))
    }

    /// Create application state over an arbitrary store.
    #[must_use]
    pub fn with_store(
        store: Arc<dyn LocalStore>,
        cart_key: &str,
        supabase: Option<SupabaseClient>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let cart = CartStore::hydrate(store, Arc::clone(&notifier), cart_key);

        Self {
            inner: Arc::new(AppStateInner {
                cart,
                notifier,
                supabase,
            }),
        }
    }

    /// Get a reference to the cart.
    #[must_use]
    pub fn cart(&self) -> &CartStore {
        &self.inner.cart
    }

    /// Get a reference to the notification sink.
    #[must_use]
    pub fn notifier(&self) -> &dyn Notifier {
        self.inner.notifier.as_ref()
    }

    /// Get the backend client.
    ///
    /// # Errors
    ///
    /// Returns `AppError::BackendNotConfigured` if the state was built
    /// without backend configuration.
    pub fn supabase(&self) -> Result<&SupabaseClient> {
        self.inner
            .supabase
            .as_ref()
            .ok_or(AppError::BackendNotConfigured)
    }
}
