//! The cart store: load, mutate, save, notify.

use rust_decimal::Decimal;
use tracing::{debug, warn};
use verse_core::ProductId;

use crate::error::add_breadcrumb;
use crate::shopify::Product;

use super::events::{CartEvents, CartNotifier, Subscription};
use super::persistence::CartPersistence;
use super::{Cart, CartError, CartLine};

/// Authoritative, persisted shopping cart.
///
/// Every mutation is a load-mutate-save sequence with no suspension point,
/// and mutations borrow the store mutably, so two of them can never
/// interleave. Storage failures are logged and never returned to callers.
pub struct CartStore<P, N = CartEvents> {
    persistence: P,
    notifier: N,
}

impl<P: CartPersistence> CartStore<P, CartEvents> {
    /// A store with its own observer list.
    pub fn new(persistence: P) -> Self {
        Self::with_notifier(persistence, CartEvents::new())
    }
}

impl<P: CartPersistence, N: CartNotifier> CartStore<P, N> {
    /// A store publishing through a caller-supplied notifier.
    pub const fn with_notifier(persistence: P, notifier: N) -> Self {
        Self {
            persistence,
            notifier,
        }
    }

    /// The persistence port.
    pub const fn persistence(&self) -> &P {
        &self.persistence
    }

    /// Register an observer that receives the cart after every change.
    pub fn subscribe<F>(&mut self, observer: F) -> Subscription
    where
        F: FnMut(&Cart) + Send + 'static,
    {
        self.notifier.subscribe(Box::new(observer))
    }

    /// Stop notifying an observer. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        self.notifier.unsubscribe(subscription)
    }

    /// Load the cart, distinguishing "nothing stored" from a failure.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Corrupt`] if the stored value does not parse and
    /// [`CartError::Storage`] if storage is unavailable.
    pub fn try_load(&self) -> Result<Cart, CartError> {
        Ok(self.persistence.load()?.unwrap_or_default())
    }

    /// Load the cart. Absent or unreadable data yields an empty cart.
    pub fn load(&self) -> Cart {
        self.try_load().unwrap_or_else(|e| {
            warn!(error = %e, "Failed to load cart, starting empty");
            Cart::new()
        })
    }

    /// Persist `cart` and notify observers.
    ///
    /// If the write fails the error is logged and observers are not
    /// notified, so they keep showing what storage actually holds.
    pub fn save(&mut self, cart: &Cart) {
        match self.persistence.save(cart) {
            Ok(()) => {
                debug!(lines = cart.len(), items = cart.item_count(), "Cart saved");
                self.notifier.publish(cart);
            }
            Err(e) => {
                warn!(error = %e, "Failed to save cart");
            }
        }
    }

    /// Add `quantity` units of `product` in `size`.
    ///
    /// Increments the existing line for `(product.id, size)` or appends a new
    /// line with a snapshot of `product`. A quantity of zero adds nothing.
    pub fn add_item(&mut self, product: &Product, quantity: u32, size: Option<&str>) {
        let mut cart = self.load();
        cart.upsert(CartLine::new(product, quantity, size));
        add_breadcrumb(
            "cart",
            "Added to cart",
            Some(&[
                ("product_id", product.id.as_str()),
                ("size", size.unwrap_or("")),
            ]),
        );
        self.save(&cart);
    }

    /// Set the quantity of the line `(product_id, size)`.
    ///
    /// A quantity of zero or less removes the line. A missing line is left
    /// missing, but the cart is still saved.
    pub fn set_quantity(&mut self, product_id: &ProductId, quantity: i64, size: Option<&str>) {
        if quantity <= 0 {
            self.remove_item(product_id, size);
            return;
        }

        let mut cart = self.load();
        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        if !cart.set_quantity(product_id, size, quantity) {
            debug!(product_id = %product_id, ?size, "No cart line to update");
        }
        self.save(&cart);
    }

    /// Remove the line `(product_id, size)`. Removing a missing line is a no-op.
    pub fn remove_item(&mut self, product_id: &ProductId, size: Option<&str>) {
        let mut cart = self.load();
        if cart.remove(product_id, size) {
            add_breadcrumb(
                "cart",
                "Removed from cart",
                Some(&[("product_id", product_id.as_str())]),
            );
        }
        self.save(&cart);
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        add_breadcrumb("cart", "Cleared cart", None);
        self.save(&Cart::new());
    }

    /// Sum of `unit price × quantity`, computed from the stored snapshots.
    pub fn total(&self) -> Decimal {
        self.load().total()
    }

    /// Sum of all line quantities.
    pub fn item_count(&self) -> u64 {
        self.load().item_count()
    }
}

impl<P: std::fmt::Debug, N: std::fmt::Debug> std::fmt::Debug for CartStore<P, N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("persistence", &self.persistence)
            .field("notifier", &self.notifier)
            .finish()
    }
}
