//! Delicious Bakers Core - Shared types library.
//!
//! This crate provides common types used across all Delicious Bakers components:
//! - `storefront` - Cart store, catalog client, checkout
//! - `cli` - The `bakers` command-line storefront and admin tools
//!
//! # Architecture
//!
//! The core crate contains only types and validation - no I/O, no HTTP
//! clients, no persistence. This keeps it lightweight and allows it to be
//! used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Product ids, cart lines, catalog records, prices, emails,
//!   and the order/contact payloads sent to the backend

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
