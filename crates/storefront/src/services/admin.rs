//! Admin product management.
//!
//! Adding a product uploads its photo to the image bucket under
//! `products/{unix_millis}.{ext}` and inserts the row with the photo's
//! public URL.

use std::path::Path;

use chrono::Utc;
use thiserror::Error;
use tracing::{info, instrument};

use delicious_bakers_core::{NewProduct, Product, ProductError};

use crate::supabase::{SupabaseClient, SupabaseError};

/// Errors that can occur while adding a product.
#[derive(Debug, Error)]
pub enum AdminError {
    #[error("Invalid product: {0}")]
    Product(#[from] ProductError),

    #[error("Unsupported image type: {0}")]
    UnsupportedImage(String),

    #[error("Backend error: {0}")]
    Supabase(#[from] SupabaseError),
}

/// An image file to upload alongside a new product.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    /// File name as picked by the admin; only the extension is kept.
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    /// Lowercased file extension.
    #[must_use]
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .filter(|ext| !ext.is_empty())
            .map(str::to_ascii_lowercase)
    }
}

/// MIME type for an image extension.
#[must_use]
pub fn content_type_for(extension: &str) -> Option<&'static str> {
    match extension {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        "avif" => Some("image/avif"),
        "svg" => Some("image/svg+xml"),
        _ => None,
    }
}

/// Bucket path for a freshly uploaded product image.
#[must_use]
pub fn image_path(unix_millis: i64, extension: &str) -> String {
    format!("products/{unix_millis}.{extension}")
}

/// Validate, upload the image, then insert the product.
///
/// Any `image_url` already on `product` is replaced by the uploaded image's
/// public URL.
///
/// # Errors
///
/// Returns an error if validation fails, the image type is not supported,
/// or either backend call fails. Nothing is inserted if the upload fails.
#[instrument(skip_all, fields(name = %product.name))]
pub async fn add_product(
    client: &SupabaseClient,
    mut product: NewProduct,
    image: ImageUpload,
) -> Result<Product, AdminError> {
    product.validate()?;

    let extension = image
        .extension()
        .ok_or_else(|| AdminError::UnsupportedImage(image.file_name.clone()))?;
    let content_type = content_type_for(&extension)
        .ok_or_else(|| AdminError::UnsupportedImage(image.file_name.clone()))?;

    let path = image_path(Utc::now().timestamp_millis(), &extension);
    let url = client
        .upload_product_image(&path, image.bytes, content_type, false)
        .await?;
    info!(path = %path, "Product image uploaded");

    product.image_url = Some(url);
    Ok(client.insert_product(&product).await?)
}
