//! Integration tests for the Delicious Bakers storefront.
//!
//! # Running Tests
//!
//! ```bash
//! # Offline tests (cart persistence, restarts)
//! cargo test -p delicious-bakers-integration-tests
//!
//! # Live backend tests
//! SUPABASE_URL=... SUPABASE_ANON_KEY=... \
//!     cargo test -p delicious-bakers-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `cart_persistence` - Cart state surviving restarts on a file store
//! - `supabase_catalog` - Catalog reads and order submission against a live project

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;
use std::sync::Arc;

use rust_decimal::Decimal;
use tempfile::TempDir;

use delicious_bakers_core::{CartProduct, ProductId};
use delicious_bakers_storefront::config::CartConfig;
use delicious_bakers_storefront::error::Result;
use delicious_bakers_storefront::notify::{Notifier, RecordingNotifier};
use delicious_bakers_storefront::state::AppState;

/// A data directory that outlives any number of simulated app sessions.
pub struct TestDevice {
    dir: TempDir,
}

impl TestDevice {
    /// # Errors
    ///
    /// Returns an error if the temporary directory cannot be created.
    pub fn new() -> std::io::Result<Self> {
        Ok(Self {
            dir: tempfile::tempdir()?,
        })
    }

    #[must_use]
    pub fn data_dir(&self) -> PathBuf {
        self.dir.path().join("bakers")
    }

    /// Start a new session: a fresh `AppState` hydrated from the device.
    ///
    /// # Errors
    ///
    /// Returns an error if the file store cannot be opened.
    pub fn launch(&self) -> Result<Session> {
        let notifier = Arc::new(RecordingNotifier::new());
        let config = CartConfig {
            data_dir: self.data_dir(),
            cart_key: "delicious-bakers-cart".to_string(),
        };
        let sink: Arc<dyn Notifier> = notifier.clone();
        let state = AppState::new(&config, None, sink)?;
        Ok(Session { state, notifier })
    }
}

/// One running app instance.
pub struct Session {
    pub state: AppState,
    pub notifier: Arc<RecordingNotifier>,
}

/// A catalog product ready to add to the cart.
#[must_use]
pub fn product(id: &str, name: &str, price: Decimal, category: &str) -> CartProduct {
    CartProduct {
        id: ProductId::new(id),
        name: name.to_string(),
        price,
        category: category.to_string(),
        image: Some(format!("https://cdn.example.test/{id}.png")),
    }
}
