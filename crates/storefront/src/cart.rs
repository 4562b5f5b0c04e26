//! The shopping cart.
//!
//! [`CartStore`] owns the ordered list of cart lines for one device. It is
//! hydrated once from a [`LocalStore`] when constructed, writes the full list
//! back after every mutation, and announces changes through a [`Notifier`].
//!
//! # Consistency
//!
//! Every mutation runs as a single read-modify-write under the store's lock,
//! starting from the latest committed list, and the snapshot is written
//! before the lock is released. Two rapid "increase quantity" calls from
//! different threads therefore both land. Notifications go out after the
//! lock is dropped so a sink may read the cart again.
//!
//! Persistence is best effort: a failed write is logged and the in-memory
//! change stands. Use [`CartStore::persist`] to observe write failures.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, error, warn};

use delicious_bakers_core::{CartItem, CartProduct, ProductId};

use crate::notify::{Notification, Notifier};
use crate::storage::{LocalStore, StorageError};

/// Storage key the cart is saved under unless configured otherwise.
pub const DEFAULT_CART_KEY: &str = "delicious-bakers-cart";

/// Errors from an explicit [`CartStore::persist`].
#[derive(Debug, Error)]
pub enum PersistError {
    /// The item list could not be encoded.
    #[error("Failed to encode cart: {0}")]
    Encode(#[from] serde_json::Error),

    /// The local store rejected the write.
    #[error("Failed to save cart: {0}")]
    Storage(#[from] StorageError),
}

/// Cart state for one device, persisted to a [`LocalStore`].
pub struct CartStore {
    items: Mutex<Vec<CartItem>>,
    store: Arc<dyn LocalStore>,
    notifier: Arc<dyn Notifier>,
    key: String,
}

impl fmt::Debug for CartStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartStore")
            .field("key", &self.key)
            .field("lines", &self.lock().len())
            .finish_non_exhaustive()
    }
}

impl CartStore {
    /// Build the cart from whatever is saved under `key`.
    ///
    /// A missing, unreadable or malformed record yields an empty cart; the
    /// problem is logged and never surfaced. Saved lines with a zero quantity
    /// are dropped and repeated ids are merged into the first occurrence.
    pub fn hydrate(
        store: Arc<dyn LocalStore>,
        notifier: Arc<dyn Notifier>,
        key: impl Into<String>,
    ) -> Self {
        let key = key.into();
        let items = load(store.as_ref(), &key);
        debug!(key = %key, lines = items.len(), "cart hydrated");

        Self {
            items: Mutex::new(items),
            store,
            notifier,
            key,
        }
    }

    /// Storage key this cart is saved under.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Snapshot of the cart lines in display order.
    #[must_use]
    pub fn items(&self) -> Vec<CartItem> {
        self.lock().clone()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Look up a single line.
    #[must_use]
    pub fn item(&self, id: &ProductId) -> Option<CartItem> {
        self.lock().iter().find(|item| &item.id == id).cloned()
    }

    /// Add one unit of `product`.
    ///
    /// An existing line for the same id gets its quantity bumped by one and
    /// keeps its original name and price; otherwise a new line is appended
    /// with quantity 1.
    pub fn add_to_cart(&self, product: CartProduct) {
        self.transition(|items| {
            if let Some(existing) = items.iter_mut().find(|item| item.id == product.id) {
                existing.quantity = existing.quantity.saturating_add(1);
                debug!(product_id = %existing.id, quantity = existing.quantity, "cart line incremented");
                Some(Notification::updated(&product.name))
            } else {
                let notification = Notification::added(&product.name);
                debug!(product_id = %product.id, "cart line added");
                items.push(CartItem::first_of(product));
                Some(notification)
            }
        });
    }

    /// Remove the line for `id`. Removing an absent id changes nothing and
    /// announces nothing.
    pub fn remove_from_cart(&self, id: &ProductId) {
        self.transition(|items| {
            let index = items.iter().position(|item| &item.id == id)?;
            let removed = items.remove(index);
            debug!(product_id = %removed.id, "cart line removed");
            Some(Notification::removed(&removed.name))
        });
    }

    /// Set the quantity of the line for `id`.
    ///
    /// A quantity of zero or less removes the line exactly as
    /// [`remove_from_cart`](Self::remove_from_cart) does. Quantities beyond
    /// `u32::MAX` are clamped. Absent ids are ignored. Quantity changes are
    /// not announced.
    pub fn update_quantity(&self, id: &ProductId, quantity: i64) {
        if quantity <= 0 {
            self.remove_from_cart(id);
            return;
        }

        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        self.transition(|items| {
            if let Some(item) = items.iter_mut().find(|item| &item.id == id) {
                item.quantity = quantity;
                debug!(product_id = %id, quantity, "cart line quantity set");
            }
            None
        });
    }

    /// Empty the cart. Always announces and persists, even when already empty.
    pub fn clear_cart(&self) {
        self.transition(|items| {
            items.clear();
            Some(Notification::cleared())
        });
    }

    /// Sum of quantities across all lines.
    #[must_use]
    pub fn total_items(&self) -> u64 {
        self.lock().iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Sum of `price * quantity` across all lines, unrounded.
    ///
    /// Saturates at the bounds of `Decimal` instead of overflowing.
    #[must_use]
    pub fn total_price(&self) -> Decimal {
        self.lock()
            .iter()
            .map(CartItem::line_total)
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }

    /// Write the current lines to the local store now.
    ///
    /// # Errors
    ///
    /// Returns a [`PersistError`] if encoding or the store write fails.
    pub fn persist(&self) -> Result<(), PersistError> {
        let items = self.lock();
        self.write(&items)
    }

    /// Apply `change` to the latest list, persist, then deliver whatever
    /// notification it produced.
    fn transition<F>(&self, change: F)
    where
        F: FnOnce(&mut Vec<CartItem>) -> Option<Notification>,
    {
        let notification = {
            let mut items = self.lock();
            let notification = change(&mut items);
            if let Err(e) = self.write(&items) {
                error!(key = %self.key, error = %e, "failed to persist cart");
            }
            notification
        };

        if let Some(notification) = notification {
            self.notifier.notify(&notification);
        }
    }

    fn write(&self, items: &[CartItem]) -> Result<(), PersistError> {
        let encoded = serde_json::to_string(items)?;
        self.store.set(&self.key, &encoded)?;
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, Vec<CartItem>> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn load(store: &dyn LocalStore, key: &str) -> Vec<CartItem> {
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            warn!(key = %key, error = %e, "could not read saved cart, starting empty");
            return Vec::new();
        }
    };

    match serde_json::from_str::<Vec<CartItem>>(&raw) {
        Ok(items) => normalize(items),
        Err(e) => {
            warn!(key = %key, error = %e, "saved cart is malformed, starting empty");
            Vec::new()
        }
    }
}

fn normalize(saved: Vec<CartItem>) -> Vec<CartItem> {
    let mut items: Vec<CartItem> = Vec::with_capacity(saved.len());
    for item in saved {
        if item.quantity == 0 {
            warn!(product_id = %item.id, "dropping saved cart line with zero quantity");
            continue;
        }
        match items.iter_mut().find(|existing| existing.id == item.id) {
            Some(existing) => {
                existing.quantity = existing.quantity.saturating_add(item.quantity);
            }
            None => items.push(item),
        }
    }
    items
}
