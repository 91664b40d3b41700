//! VERSE Core - Shared types library.
//!
//! This crate provides common types used across all VERSE components:
//! - `storefront` - Cart store, catalog and backend clients, checkout flow
//! - `cli` - The `verse` terminal storefront
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no storage access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices, contact details and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
