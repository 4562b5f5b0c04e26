//! Core types for Delicious Bakers.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod cart;
pub mod email;
pub mod id;
pub mod order;
pub mod price;
pub mod product;

pub use cart::{CartItem, CartProduct};
pub use email::{Email, EmailError};
pub use id::*;
pub use order::{ContactMessage, OrderRequest};
pub use price::{CurrencyCode, Price};
pub use product::{NewProduct, Product, ProductError};
