//! Cart commands.
//!
//! Everything except `add` works from the saved cart alone.

use tracing::debug;

use delicious_bakers_core::{CartProduct, Price, ProductId};
use delicious_bakers_storefront::error::Result;
use delicious_bakers_storefront::state::AppState;

/// Print cart lines and totals.
pub fn show(state: &AppState) {
    let cart = state.cart();
    let items = cart.items();

    #[allow(clippy::print_stdout)]
    {
        if items.is_empty() {
            println!("Your cart is empty.");
            return;
        }
        for item in &items {
            println!(
                "{:<12} {:<28} {:>4} x {:>12} = {:>12}",
                item.id.as_str(),
                item.name,
                item.quantity,
                Price::local(item.price).to_string(),
                Price::local(item.line_total()).to_string(),
            );
        }
        println!();
        println!("Items: {}", cart.total_items());
        println!("Total: {}", Price::local(cart.total_price()));
    }
}

/// Look the product up in the catalog and add one unit.
pub async fn add(state: &AppState, id: &str) -> Result<()> {
    let product = state.supabase()?.product(&ProductId::new(id)).await?;
    debug!(product_id = %product.id, "adding product to cart");
    state.cart().add_to_cart(CartProduct::from(&product));
    sync(state)
}

pub fn remove(state: &AppState, id: &str) -> Result<()> {
    state.cart().remove_from_cart(&ProductId::new(id));
    sync(state)
}

pub fn update(state: &AppState, id: &str, quantity: i64) -> Result<()> {
    state.cart().update_quantity(&ProductId::new(id), quantity);
    sync(state)?;
    show(state);
    Ok(())
}

pub fn clear(state: &AppState) -> Result<()> {
    state.cart().clear_cart();
    sync(state)
}

/// The process exits right after a cart command, so a write the cart could
/// only log has to fail the command instead.
fn sync(state: &AppState) -> Result<()> {
    state.cart().persist()?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use delicious_bakers_storefront::error::AppError;
    use delicious_bakers_storefront::notify::RecordingNotifier;
    use delicious_bakers_storefront::storage::{LocalStore, MemoryStore, StorageError};

    use super::*;

    struct ReadOnlyStore;

    impl LocalStore for ReadOnlyStore {
        fn get(&self, _key: &str) -> std::result::Result<Option<String>, StorageError> {
            Ok(Some(
                r#"[{"id":"a","name":"Croissant","price":"150","quantity":1,"category":"Bread"}]"#
                    .to_string(),
            ))
        }

        fn set(&self, key: &str, _value: &str) -> std::result::Result<(), StorageError> {
            Err(StorageError::InvalidKey(key.to_string()))
        }

        fn remove(&self, _key: &str) -> std::result::Result<(), StorageError> {
            Ok(())
        }
    }

    fn state(store: Arc<dyn LocalStore>) -> AppState {
        AppState::with_store(store, "cart", None, Arc::new(RecordingNotifier::new()))
    }

    #[test]
    fn test_failed_write_fails_the_command() {
        let state = state(Arc::new(ReadOnlyStore));

        let result = remove(&state, "a");

        assert!(matches!(result, Err(AppError::Persist(_))));
        assert!(state.cart().is_empty());
    }

    #[test]
    fn test_cart_commands_succeed_on_writable_store() {
        let store = Arc::new(MemoryStore::new());
        let state = state(store.clone());

        clear(&state).unwrap();
        remove(&state, "missing").unwrap();

        assert_eq!(store.get("cart").unwrap().as_deref(), Some("[]"));
    }
}
