//! Cart line types.
//!
//! A [`CartProduct`] is what the catalog hands to the cart: everything about
//! a product except how many the customer wants. The cart turns it into a
//! [`CartItem`] by assigning the quantity itself.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::product::Product;

/// A product offered for adding to the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartProduct {
    pub id: ProductId,
    pub name: String,
    /// Unit price at the moment the product was offered.
    pub price: Decimal,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// One line in the cart.
///
/// Serialized field-for-field into the persisted cart record. `image` may be
/// missing from records written before images were tracked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: ProductId,
    pub name: String,
    /// Unit price locked in when the line was first added.
    pub price: Decimal,
    /// Always at least 1 while the line is in a cart.
    pub quantity: u32,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl CartItem {
    /// Start a new line with a quantity of one.
    #[must_use]
    pub fn first_of(product: CartProduct) -> Self {
        Self {
            id: product.id,
            name: product.name,
            price: product.price,
            quantity: 1,
            category: product.category,
            image: product.image,
        }
    }

    /// `price * quantity`, saturating at the bounds of `Decimal`.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price.saturating_mul(Decimal::from(self.quantity))
    }
}

impl From<&Product> for CartProduct {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            price: product.price,
            category: product.category.clone(),
            image: product.image_url.clone().or_else(|| product.image.clone()),
        }
    }
}
