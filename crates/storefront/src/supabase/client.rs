//! `SupabaseClient` implementation.
//!
//! Uses `reqwest` for HTTP with the anon key sent as both `apikey` and bearer
//! token. Caches catalog reads using `moka` (5-minute TTL).

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use delicious_bakers_core::{ContactMessage, NewProduct, OrderRequest, Product, ProductId};

use super::SupabaseError;
use super::cache::{CacheKey, CacheValue};
use crate::config::SupabaseConfig;

/// Category name that matches every product.
pub const ALL_CATEGORIES: &str = "All";

/// Longest error body excerpt kept in errors and logs.
const ERROR_BODY_LIMIT: usize = 500;

// =============================================================================
// SupabaseClient
// =============================================================================

/// Client for the catalog tables and image storage.
///
/// Cheap to clone; clones share the HTTP pool and cache.
#[derive(Clone)]
pub struct SupabaseClient {
    inner: Arc<SupabaseClientInner>,
}

struct SupabaseClientInner {
    client: reqwest::Client,
    base_url: String,
    image_bucket: String,
    cache: Cache<CacheKey, CacheValue>,
}

impl std::fmt::Debug for SupabaseClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupabaseClient")
            .field("base_url", &self.inner.base_url)
            .field("image_bucket", &self.inner.image_bucket)
            .finish_non_exhaustive()
    }
}

#[derive(Deserialize)]
struct CategoryRow {
    name: String,
}

impl SupabaseClient {
    /// Create a new client.
    ///
    /// # Errors
    ///
    /// Returns an error if the key cannot be used as a header value or the
    /// HTTP client fails to build.
    pub fn new(config: &SupabaseConfig) -> Result<Self, SupabaseError> {
        let key = config.expose_key();
        let mut headers = HeaderMap::new();
        headers.insert(
            "apikey",
            HeaderValue::from_str(key).map_err(|e| SupabaseError::InvalidKey(e.to_string()))?,
        );
        let mut bearer = HeaderValue::from_str(&format!("Bearer {key}"))
            .map_err(|e| SupabaseError::InvalidKey(e.to_string()))?;
        bearer.set_sensitive(true);
        headers.insert(AUTHORIZATION, bearer);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(30))
            .build()?;

        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Ok(Self {
            inner: Arc::new(SupabaseClientInner {
                client,
                base_url: config.base_url().to_string(),
                image_bucket: config.image_bucket.clone(),
                cache,
            }),
        })
    }

    // =========================================================================
    // URLs
    // =========================================================================

    fn rest_url(&self, table: &str, query: &str) -> String {
        if query.is_empty() {
            format!("{}/rest/v1/{table}", self.inner.base_url)
        } else {
            format!("{}/rest/v1/{table}?{query}", self.inner.base_url)
        }
    }

    fn object_url(&self, path: &str) -> String {
        format!(
            "{}/storage/v1/object/{}/{}",
            self.inner.base_url,
            self.inner.image_bucket,
            encode_object_path(path)
        )
    }

    /// Public URL of an object in the image bucket.
    #[must_use]
    pub fn public_image_url(&self, path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.inner.base_url,
            self.inner.image_bucket,
            encode_object_path(path)
        )
    }

    /// Fill in `image_url` from `image` when the row has no URL of its own.
    fn resolve_image(&self, mut product: Product) -> Product {
        if product.image_url.is_none()
            && let Some(path) = product.image.as_deref().filter(|p| !p.is_empty())
        {
            product.image_url = Some(self.public_image_url(path));
        }
        product
    }

    // =========================================================================
    // Request plumbing
    // =========================================================================

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, SupabaseError> {
        let response = self.inner.client.get(url).send().await?;
        let body = check_response(response).await?;
        parse_body(&body)
    }

    // =========================================================================
    // Catalog reads
    // =========================================================================

    /// All products, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the rows cannot be parsed.
    #[instrument(skip(self))]
    pub async fn products(&self) -> Result<Vec<Product>, SupabaseError> {
        if let Some(CacheValue::Products(products)) = self.inner.cache.get(&CacheKey::Products).await
        {
            debug!("Cache hit for products");
            return Ok(products);
        }

        let rows: Vec<Product> = self
            .get_json(&self.rest_url("products", "select=*&order=created_at.desc"))
            .await?;
        let products: Vec<Product> = rows.into_iter().map(|p| self.resolve_image(p)).collect();
        debug!(count = products.len(), "Fetched products");

        self.inner
            .cache
            .insert(CacheKey::Products, CacheValue::Products(products.clone()))
            .await;

        Ok(products)
    }

    /// Products in `category`; [`ALL_CATEGORIES`] returns every product.
    ///
    /// # Errors
    ///
    /// Returns an error if the product list cannot be fetched.
    pub async fn products_in_category(&self, category: &str) -> Result<Vec<Product>, SupabaseError> {
        Ok(filter_by_category(self.products().await?, category))
    }

    /// Products flagged for the home page.
    ///
    /// # Errors
    ///
    /// Returns an error if the product list cannot be fetched.
    pub async fn featured_products(&self) -> Result<Vec<Product>, SupabaseError> {
        Ok(self
            .products()
            .await?
            .into_iter()
            .filter(|p| p.is_featured)
            .collect())
    }

    /// A single product by id.
    ///
    /// # Errors
    ///
    /// Returns `SupabaseError::NotFound` if no row has this id, or an error if
    /// the API request fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn product(&self, id: &ProductId) -> Result<Product, SupabaseError> {
        let cache_key = CacheKey::Product(id.clone());
        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let query = format!("select=*&id=eq.{}", urlencoding::encode(id.as_str()));
        let rows: Vec<Product> = self.get_json(&self.rest_url("products", &query)).await?;
        let product = rows
            .into_iter()
            .next()
            .map(|p| self.resolve_image(p))
            .ok_or_else(|| SupabaseError::NotFound(format!("Product not found: {id}")))?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    /// Category names from the `categories` table.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn categories(&self) -> Result<Vec<String>, SupabaseError> {
        if let Some(CacheValue::Categories(names)) =
            self.inner.cache.get(&CacheKey::Categories).await
        {
            debug!("Cache hit for categories");
            return Ok(names);
        }

        let rows: Vec<CategoryRow> = self
            .get_json(&self.rest_url("categories", "select=name"))
            .await?;
        let names: Vec<String> = rows.into_iter().map(|row| row.name).collect();

        self.inner
            .cache
            .insert(CacheKey::Categories, CacheValue::Categories(names.clone()))
            .await;

        Ok(names)
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Insert a product and return the stored row.
    ///
    /// Drops every cached catalog read so the new row shows up immediately.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns no row.
    #[instrument(skip(self, product), fields(name = %product.name))]
    pub async fn insert_product(&self, product: &NewProduct) -> Result<Product, SupabaseError> {
        let response = self
            .inner
            .client
            .post(self.rest_url("products", ""))
            .header("Prefer", "return=representation")
            .json(&[product])
            .send()
            .await?;
        let body = check_response(response).await?;
        let rows: Vec<Product> = parse_body(&body)?;

        self.inner.cache.invalidate_all();

        let stored = rows.into_iter().next().ok_or_else(|| SupabaseError::Api {
            status: StatusCode::OK.as_u16(),
            message: "insert returned no rows".to_string(),
        })?;
        tracing::info!(product_id = %stored.id, "Product inserted");
        Ok(self.resolve_image(stored))
    }

    /// Upload an image into the bucket at `path` and return its public URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the upload is rejected (e.g. the path exists and
    /// `upsert` is false).
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    pub async fn upload_product_image(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
        upsert: bool,
    ) -> Result<String, SupabaseError> {
        let response = self
            .inner
            .client
            .post(self.object_url(path))
            .header("Content-Type", content_type)
            .header("cache-control", "3600")
            .header("x-upsert", if upsert { "true" } else { "false" })
            .body(bytes)
            .send()
            .await?;
        check_response(response).await?;

        Ok(self.public_image_url(path))
    }

    /// Insert order rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, orders), fields(rows = orders.len()))]
    pub async fn insert_orders(&self, orders: &[OrderRequest]) -> Result<(), SupabaseError> {
        self.insert_minimal("orders", &orders).await
    }

    /// Insert a contact form message.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, message))]
    pub async fn insert_contact_message(
        &self,
        message: &ContactMessage,
    ) -> Result<(), SupabaseError> {
        self.insert_minimal("messages", &[message]).await
    }

    async fn insert_minimal<T: serde::Serialize + ?Sized>(
        &self,
        table: &str,
        rows: &T,
    ) -> Result<(), SupabaseError> {
        let response = self
            .inner
            .client
            .post(self.rest_url(table, ""))
            .header("Prefer", "return=minimal")
            .json(rows)
            .send()
            .await?;
        check_response(response).await?;
        Ok(())
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Map rate limiting and non-success statuses to errors; return the body.
async fn check_response(response: Response) -> Result<String, SupabaseError> {
    let status = response.status();

    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get("Retry-After")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(1);
        return Err(SupabaseError::RateLimited(retry_after));
    }

    let body = response.text().await?;

    if !status.is_success() {
        let message = truncate(&body, ERROR_BODY_LIMIT);
        tracing::error!(status = %status, body = %message, "Backend returned non-success status");
        return Err(SupabaseError::Api {
            status: status.as_u16(),
            message,
        });
    }

    Ok(body)
}

fn parse_body<T: DeserializeOwned>(body: &str) -> Result<T, SupabaseError> {
    serde_json::from_str(body).map_err(|e| {
        tracing::error!(
            error = %e,
            body = %truncate(body, ERROR_BODY_LIMIT),
            "Failed to parse backend response"
        );
        SupabaseError::Parse(e)
    })
}

fn truncate(s: &str, limit: usize) -> String {
    s.chars().take(limit).collect()
}

/// Percent-encode each path segment, keeping the `/` separators.
fn encode_object_path(path: &str) -> String {
    path.trim_start_matches('/')
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// Keep products whose category matches exactly; [`ALL_CATEGORIES`] keeps all.
#[must_use]
pub fn filter_by_category(products: Vec<Product>, category: &str) -> Vec<Product> {
    if category == ALL_CATEGORIES {
        return products;
    }
    products
        .into_iter()
        .filter(|p| p.category == category)
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use secrecy::SecretString;

    fn client() -> SupabaseClient {
        let config = SupabaseConfig::new(
            "https://abcd.supabase.co/",
            SecretString::from("eyJhbGciOiJIUzI1NiJ9.eyJyb2xlIjoiYW5vbiJ9.c2ln"),
        )
        .unwrap();
        SupabaseClient::new(&config).unwrap()
    }

    fn product(id: &str, category: &str) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            description: String::new(),
            price: Decimal::new(10, 0),
            category: category.to_string(),
            image: None,
            image_url: None,
            is_featured: false,
            created_at: None,
        }
    }

    #[test]
    fn test_rest_urls() {
        let client = client();
        assert_eq!(
            client.rest_url("products", "select=*&order=created_at.desc"),
            "https://abcd.supabase.co/rest/v1/products?select=*&order=created_at.desc"
        );
        assert_eq!(
            client.rest_url("orders", ""),
            "https://abcd.supabase.co/rest/v1/orders"
        );
    }

    #[test]
    fn test_storage_urls_encode_segments() {
        let client = client();
        assert_eq!(
            client.object_url("products/1700000000000.png"),
            "https://abcd.supabase.co/storage/v1/object/product-images/products/1700000000000.png"
        );
        assert_eq!(
            client.public_image_url("/cakes/red velvet.png"),
            "https://abcd.supabase.co/storage/v1/object/public/product-images/cakes/red%20velvet.png"
        );
    }

    #[test]
    fn test_resolve_image_prefers_existing_url() {
        let client = client();

        let mut with_url = product("1", "Cakes");
        with_url.image = Some("cake1.png".to_string());
        with_url.image_url = Some("https://cdn.example/cake.png".to_string());
        assert_eq!(
            client.resolve_image(with_url).image_url.as_deref(),
            Some("https://cdn.example/cake.png")
        );

        let mut path_only = product("2", "Cakes");
        path_only.image = Some("cake1.png".to_string());
        assert_eq!(
            client.resolve_image(path_only).image_url.as_deref(),
            Some("https://abcd.supabase.co/storage/v1/object/public/product-images/cake1.png")
        );

        assert!(client.resolve_image(product("3", "Cakes")).image_url.is_none());
    }

    #[test]
    fn test_filter_by_category() {
        let products = vec![
            product("1", "Cakes"),
            product("2", "Bread"),
            product("3", "Cakes"),
        ];

        let cakes = filter_by_category(products.clone(), "Cakes");
        assert_eq!(cakes.len(), 2);

        assert_eq!(filter_by_category(products.clone(), ALL_CATEGORIES).len(), 3);
        assert!(filter_by_category(products, "Sandwiches").is_empty());
    }

    #[test]
    fn test_truncate_counts_chars() {
        assert_eq!(truncate("héllo", 2), "hé");
        assert_eq!(truncate("ok", 10), "ok");
    }

    #[test]
    fn test_parse_body_error() {
        let result: Result<Vec<Product>, _> = parse_body("<html>oops</html>");
        assert!(matches!(result, Err(SupabaseError::Parse(_))));
    }

    #[test]
    fn test_category_rows_parse() {
        let rows: Vec<CategoryRow> = parse_body(r#"[{"name":"Cakes"},{"name":"Bread"}]"#).unwrap();
        let names: Vec<_> = rows.into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["Cakes", "Bread"]);
    }
}
