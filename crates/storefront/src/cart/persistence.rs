//! Cart persistence port and its key-value implementation.

use crate::storage::KeyValueStore;

use super::{Cart, CartError};

/// Storage key holding the serialized cart.
pub const CART_STORAGE_KEY: &str = "verse-cart";

/// Durable storage for the whole cart.
pub trait CartPersistence {
    /// Read the stored cart. `Ok(None)` means nothing has been stored yet.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Storage`] if the backing store fails and
    /// [`CartError::Corrupt`] if the stored value does not parse.
    fn load(&self) -> Result<Option<Cart>, CartError>;

    /// Replace the stored cart.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Storage`] if the value cannot be written.
    fn save(&self, cart: &Cart) -> Result<(), CartError>;
}

/// Cart persisted as a JSON array under [`CART_STORAGE_KEY`].
#[derive(Debug, Clone)]
pub struct StoredCart<S> {
    store: S,
}

impl<S: KeyValueStore> StoredCart<S> {
    /// Persist carts into `store`.
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// The underlying key-value store.
    pub const fn store(&self) -> &S {
        &self.store
    }
}

impl<S: KeyValueStore> CartPersistence for StoredCart<S> {
    fn load(&self) -> Result<Option<Cart>, CartError> {
        let Some(raw) = self.store.get(CART_STORAGE_KEY)? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(CartError::Corrupt)
    }

    fn save(&self, cart: &Cart) -> Result<(), CartError> {
        let raw = serde_json::to_string(cart).map_err(crate::storage::StorageError::from)?;
        self.store.set(CART_STORAGE_KEY, &raw)?;
        Ok(())
    }
}
