//! Change notification for cart observers.
//!
//! Every successful save publishes the full new cart to all current
//! subscribers, in the order they subscribed. Delivery is synchronous; an
//! observer that subscribes later has missed earlier events and should
//! resync by loading the cart.

use super::Cart;

/// Callback invoked with the new cart after every change.
pub type Observer = Box<dyn FnMut(&Cart) + Send>;

/// Handle returned by [`CartNotifier::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

/// Publish/subscribe channel for cart changes.
pub trait CartNotifier {
    /// Register an observer. It receives every later publish.
    fn subscribe(&mut self, observer: Observer) -> Subscription;

    /// Remove an observer. Returns `false` if it was not registered.
    fn unsubscribe(&mut self, subscription: Subscription) -> bool;

    /// Deliver `cart` to every registered observer.
    fn publish(&mut self, cart: &Cart);
}

/// Observer list owned by the cart store.
#[derive(Default)]
pub struct CartEvents {
    next_id: u64,
    observers: Vec<(Subscription, Observer)>,
}

impl CartEvents {
    /// A notifier with no observers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered observers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.observers.len()
    }

    /// Whether no observer is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl std::fmt::Debug for CartEvents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartEvents")
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl CartNotifier for CartEvents {
    fn subscribe(&mut self, observer: Observer) -> Subscription {
        let subscription = Subscription(self.next_id);
        self.next_id += 1;
        self.observers.push((subscription, observer));
        subscription
    }

    fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(s, _)| *s != subscription);
        self.observers.len() != before
    }

    fn publish(&mut self, cart: &Cart) {
        for (_, observer) in &mut self.observers {
            observer(cart);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    fn recorder(log: &Arc<Mutex<Vec<String>>>, name: &'static str) -> Observer {
        let log = Arc::clone(log);
        Box::new(move |cart: &Cart| {
            log.lock()
                .unwrap()
                .push(format!("{name}:{}", cart.item_count()));
        })
    }

    #[test]
    fn test_publish_in_subscription_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut events = CartEvents::new();
        events.subscribe(recorder(&log, "badge"));
        events.subscribe(recorder(&log, "drawer"));

        events.publish(&Cart::new());

        assert_eq!(*log.lock().unwrap(), vec!["badge:0", "drawer:0"]);
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut events = CartEvents::new();
        let badge = events.subscribe(recorder(&log, "badge"));
        events.subscribe(recorder(&log, "drawer"));

        assert!(events.unsubscribe(badge));
        assert!(!events.unsubscribe(badge));
        events.publish(&Cart::new());

        assert_eq!(*log.lock().unwrap(), vec!["drawer:0"]);
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_late_subscriber_misses_earlier_events() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut events = CartEvents::new();
        events.publish(&Cart::new());
        events.subscribe(recorder(&log, "late"));

        assert!(log.lock().unwrap().is_empty());
    }
}
