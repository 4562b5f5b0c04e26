//! Live tests against a Supabase project.
//!
//! These tests require:
//! - `SUPABASE_URL` and `SUPABASE_ANON_KEY` in the environment
//! - `products`, `categories`, `orders` and `messages` tables readable and
//!   insertable with the anon key
//!
//! Run with: `cargo test -p delicious-bakers-integration-tests -- --ignored`

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::sync::Arc;

use chrono::{Duration, Utc};
use delicious_bakers_core::{CartProduct, Email, ProductId};
use delicious_bakers_storefront::config::SupabaseConfig;
use delicious_bakers_storefront::notify::{NotificationKind, Notifier, RecordingNotifier};
use delicious_bakers_storefront::services::checkout::{OrderForm, place_order};
use delicious_bakers_storefront::state::AppState;
use delicious_bakers_storefront::storage::MemoryStore;
use delicious_bakers_storefront::supabase::{SupabaseClient, SupabaseError};

fn client() -> SupabaseClient {
    let config = SupabaseConfig::from_env().expect("SUPABASE_URL and SUPABASE_ANON_KEY must be set");
    SupabaseClient::new(&config).unwrap()
}

#[tokio::test]
#[ignore = "Requires a live Supabase project"]
async fn test_products_are_newest_first() {
    let products = client().products().await.unwrap();

    let dates: Vec<_> = products.iter().filter_map(|p| p.created_at).collect();
    assert!(dates.windows(2).all(|w| w[0] >= w[1]));
}

#[tokio::test]
#[ignore = "Requires a live Supabase project"]
async fn test_all_category_returns_everything() {
    let client = client();
    let all = client.products().await.unwrap();
    let via_all = client.products_in_category("All").await.unwrap();
    assert_eq!(all.len(), via_all.len());

    if let Some(first) = all.first() {
        let same_category = client.products_in_category(&first.category).await.unwrap();
        assert!(same_category.iter().all(|p| p.category == first.category));
    }
}

#[tokio::test]
#[ignore = "Requires a live Supabase project"]
async fn test_unknown_product_is_not_found() {
    let result = client()
        .product(&ProductId::new("00000000-0000-0000-0000-000000000000"))
        .await;
    assert!(matches!(result, Err(SupabaseError::NotFound(_))));
}

#[tokio::test]
#[ignore = "Requires a live Supabase project"]
async fn test_categories_are_listed() {
    let categories = client().categories().await.unwrap();
    assert!(categories.iter().all(|name| !name.is_empty()));
}

#[tokio::test]
#[ignore = "Requires a live Supabase project and inserts an order"]
async fn test_checkout_submits_and_clears_cart() {
    let client = client();
    let Some(product) = client.products().await.unwrap().into_iter().next() else {
        return;
    };

    let notifier = Arc::new(RecordingNotifier::new());
    let sink: Arc<dyn Notifier> = notifier.clone();
    let state = AppState::with_store(
        Arc::new(MemoryStore::new()),
        "cart",
        Some(client),
        sink,
    );
    state.cart().add_to_cart(CartProduct::from(&product));

    let form = OrderForm {
        name: "Integration Test".to_string(),
        email: Email::parse("integration@deliciousbakers.test").unwrap(),
        phone: "0000000000".to_string(),
        delivery_date: (Utc::now() + Duration::days(7)).date_naive(),
        special_requests: Some("Automated test order, please ignore".to_string()),
    };

    let rows = place_order(
        state.cart(),
        state.supabase().unwrap(),
        state.notifier(),
        &form,
    )
    .await
    .unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].product, product.name);
    assert!(state.cart().is_empty());
    assert_eq!(
        notifier.kinds(),
        vec![
            NotificationKind::Added,
            NotificationKind::Cleared,
            NotificationKind::OrderSubmitted
        ]
    );
}
