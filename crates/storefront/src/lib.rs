//! VERSE storefront library.
//!
//! Client-side commerce logic for the VERSE apparel store: a persistent
//! shopping cart with change notification, a cached Shopify product catalog,
//! clients for the AI backend (size and style advice, order tracking,
//! virtual try-on) and a checkout flow supporting cash on delivery and
//! online payment.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod advisor;
pub mod backend;
pub mod cart;
pub mod checkout;
pub mod config;
pub mod error;
pub mod shopify;
pub mod storage;
pub mod telemetry;
pub mod tryon;
