//! Client-side shopping cart.
//!
//! The cart is an ordered list of lines keyed by `(product_id, size)`,
//! persisted as a single JSON value and broadcast to observers after every
//! change. [`CartStore`] is the only writer.

mod events;
mod persistence;
mod store;
pub(crate) mod types;
mod view;

use thiserror::Error;

use crate::storage::StorageError;

pub use events::{CartEvents, CartNotifier, Observer, Subscription};
pub use persistence::{CART_STORAGE_KEY, CartPersistence, StoredCart};
pub use store::CartStore;
pub use types::{Cart, CartLine, ProductSnapshot};
pub use view::{CartItemView, CartView};

/// Errors reading or writing the persisted cart.
#[derive(Debug, Error)]
pub enum CartError {
    /// The backing store failed.
    #[error("cart storage error: {0}")]
    Storage(#[from] StorageError),

    /// The stored cart is not valid JSON for a cart.
    #[error("stored cart is corrupt: {0}")]
    Corrupt(#[source] serde_json::Error),
}
