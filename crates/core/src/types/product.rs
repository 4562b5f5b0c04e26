//! Catalog product records.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::id::ProductId;

/// A product row as stored in the `products` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Decimal,
    pub category: String,
    /// Object path inside the image bucket (e.g. `cake1.png`).
    #[serde(default)]
    pub image: Option<String>,
    /// Fully resolved public URL, when the row carries one.
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Validation failures for [`NewProduct`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProductError {
    /// A required text field is blank.
    #[error("{0} is required")]
    MissingField(&'static str),
    /// Price below zero.
    #[error("price cannot be negative (got {0})")]
    NegativePrice(Decimal),
}

/// A product to insert from the admin tools.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub is_featured: bool,
}

impl NewProduct {
    /// Check that every field the admin form requires is present.
    ///
    /// # Errors
    ///
    /// Returns the first [`ProductError`] found.
    pub fn validate(&self) -> Result<(), ProductError> {
        for (field, value) in [
            ("name", &self.name),
            ("description", &self.description),
            ("category", &self.category),
        ] {
            if value.trim().is_empty() {
                return Err(ProductError::MissingField(field));
            }
        }
        if self.price < Decimal::ZERO {
            return Err(ProductError::NegativePrice(self.price));
        }
        Ok(())
    }
}
