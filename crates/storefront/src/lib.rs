//! Delicious Bakers storefront library.
//!
//! The persistent shopping cart, the catalog and storage client, and the
//! checkout, contact and admin services built on them. The `bakers` CLI is a
//! thin front end over this crate.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod config;
pub mod error;
pub mod notify;
pub mod services;
pub mod state;
pub mod storage;
pub mod supabase;
