//! Admin commands.
//!
//! # Usage
//!
//! ```bash
//! bakers admin add-product --name "Red Velvet Cake" --description "Cream cheese frosting" \
//!     --price 28 --category Cakes --image red-velvet.jpg --featured
//! ```

use std::path::PathBuf;

use rust_decimal::Decimal;
use tracing::info;

use delicious_bakers_core::{NewProduct, Price};
use delicious_bakers_storefront::error::{AppError, Result};
use delicious_bakers_storefront::services::admin::{self, ImageUpload};
use delicious_bakers_storefront::state::AppState;

/// Arguments of `admin add-product`.
pub struct ProductArgs {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub category: String,
    pub image: PathBuf,
    pub featured: bool,
}

/// Upload the image and insert the product.
pub async fn add_product(state: &AppState, args: ProductArgs) -> Result<()> {
    let bytes = tokio::fs::read(&args.image).await.map_err(|e| {
        AppError::BadRequest(format!("cannot read {}: {e}", args.image.display()))
    })?;
    let file_name = args
        .image
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let product = NewProduct {
        name: args.name,
        description: args.description,
        price: args.price,
        category: args.category,
        image_url: None,
        is_featured: args.featured,
    };

    let stored = admin::add_product(state.supabase()?, product, ImageUpload { file_name, bytes })
        .await?;
    info!(product_id = %stored.id, "Product added");

    #[allow(clippy::print_stdout)]
    {
        println!(
            "Added {} ({}) at {}",
            stored.name,
            stored.id,
            Price::local(stored.price)
        );
        if let Some(url) = &stored.image_url {
            println!("Image: {url}");
        }
    }
    Ok(())
}
