//! Callback registry for store event subscriptions.
//!
//! This module provides a thread-safe registry for managing key-scoped event
//! callbacks. Subscribers receive [`StoreEvent`](super::StoreEvent)
//! notifications for the key they subscribed to.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, Weak};

use super::events::StoreEvent;

/// A unique identifier for a subscription.
pub type SubscriptionId = u64;

/// Callback function type for store events.
///
/// Callbacks receive a reference to the event and should not block for extended periods.
pub type EventCallback = Arc<dyn Fn(&StoreEvent) + Send + Sync>;

struct Registration {
    /// `None` subscribes to every key.
    topic: Option<String>,
    callback: EventCallback,
}

/// Thread-safe registry for managing event subscriptions.
///
/// The registry supports:
/// - Subscribing to one key (or to all keys) with unique IDs
/// - Unsubscribing by ID, or by dropping a [`Subscription`] guard
/// - Emitting events to the subscribers of the event's key
///
/// # Example
///
/// ```ignore
/// use abide_core::bridge::{CallbackRegistry, StoreEvent};
/// use std::sync::Arc;
///
/// let registry = Arc::new(CallbackRegistry::new());
///
/// let id = registry.subscribe("gracePoints", Arc::new(|event| {
///     println!("Event: {:?}", event);
/// }));
///
/// registry.emit(&StoreEvent::value_changed("gracePoints", 4.into()));
///
/// registry.unsubscribe(id);
/// ```
pub struct CallbackRegistry {
    /// Map of subscription IDs to callbacks, in subscription order.
    callbacks: RwLock<BTreeMap<SubscriptionId, Registration>>,
    /// Counter for generating unique subscription IDs.
    next_id: AtomicU64,
}

impl CallbackRegistry {
    /// Create a new empty callback registry.
    pub fn new() -> Self {
        Self {
            callbacks: RwLock::new(BTreeMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Subscribe to events for one key.
    ///
    /// Returns a subscription ID that can be used to unsubscribe later.
    pub fn subscribe(&self, key: impl Into<String>, callback: EventCallback) -> SubscriptionId {
        self.register(Some(key.into()), callback)
    }

    /// Subscribe to events for every key.
    pub fn subscribe_all(&self, callback: EventCallback) -> SubscriptionId {
        self.register(None, callback)
    }

    fn register(&self, topic: Option<String>, callback: EventCallback) -> SubscriptionId {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let mut callbacks = self
            .callbacks
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        callbacks.insert(id, Registration { topic, callback });
        id
    }

    /// Unsubscribe from events.
    ///
    /// Returns `true` if the subscription was found and removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut callbacks = self
            .callbacks
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        callbacks.remove(&id).is_some()
    }

    /// Emit an event to every callback subscribed to its key.
    ///
    /// Callbacks are invoked synchronously in subscription order, outside the
    /// registry lock, so a callback may itself subscribe or unsubscribe.
    /// If a callback panics, it does not affect other callbacks.
    pub fn emit(&self, event: &StoreEvent) {
        let targets: Vec<EventCallback> = {
            let callbacks = self.callbacks.read().unwrap_or_else(PoisonError::into_inner);
            callbacks
                .values()
                .filter(|r| r.topic.as_deref().is_none_or(|topic| topic == event.key()))
                .map(|r| Arc::clone(&r.callback))
                .collect()
        };

        log::debug!(
            "Emitting {} for '{}' to {} subscriber(s)",
            event.event_type(),
            event.key(),
            targets.len()
        );

        for callback in targets {
            // Use catch_unwind to prevent one callback from breaking others
            let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                callback(event);
            }));
        }
    }

    /// Get the number of active subscriptions.
    pub fn subscriber_count(&self) -> usize {
        let callbacks = self.callbacks.read().unwrap_or_else(PoisonError::into_inner);
        callbacks.len()
    }

    /// Get the number of subscriptions that would receive events for `key`.
    pub fn subscriber_count_for(&self, key: &str) -> usize {
        let callbacks = self.callbacks.read().unwrap_or_else(PoisonError::into_inner);
        callbacks
            .values()
            .filter(|r| r.topic.as_deref().is_none_or(|topic| topic == key))
            .count()
    }

    /// Check if there are any active subscriptions.
    pub fn has_subscribers(&self) -> bool {
        let callbacks = self.callbacks.read().unwrap_or_else(PoisonError::into_inner);
        !callbacks.is_empty()
    }

    /// Clear all subscriptions.
    pub fn clear(&self) {
        let mut callbacks = self
            .callbacks
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        callbacks.clear();
    }
}

impl Default for CallbackRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CallbackRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackRegistry")
            .field("subscriber_count", &self.subscriber_count())
            .field("next_id", &self.next_id.load(Ordering::SeqCst))
            .finish()
    }
}

/// Guard that unsubscribes when dropped.
///
/// Holds the registry weakly, so a guard outliving its store is harmless.
#[must_use = "dropping a Subscription unsubscribes immediately"]
#[derive(Debug)]
pub struct Subscription {
    registry: Weak<CallbackRegistry>,
    id: SubscriptionId,
}

impl Subscription {
    /// Subscribe to `key` on `registry` and return the guard.
    pub fn new(
        registry: &Arc<CallbackRegistry>,
        key: impl Into<String>,
        callback: EventCallback,
    ) -> Self {
        let id = registry.subscribe(key, callback);
        Self {
            registry: Arc::downgrade(registry),
            id,
        }
    }

    /// The underlying subscription ID.
    pub fn id(&self) -> SubscriptionId {
        self.id
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.unsubscribe(self.id);
        }
    }
}
