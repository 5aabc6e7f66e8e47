//! Live in-memory bindings of store keys.
//!
//! A [`Binding`] holds the current value of one key and stays consistent
//! with every other binding of that key:
//!
//! ```text
//! binding.set(v) → local value = v → Store::write → StoreEvent::ValueChanged
//!                                                        ↓
//!                                     every other binding of the key updates
//! ```
//!
//! With [`BindingOptions::sync_across_contexts`] the binding also accepts
//! [`StoreEvent::ExternalChange`] signals forwarded by
//! [`Store::poll_external`](crate::store::Store::poll_external).
//!
//! A binding whose slot holds data it cannot read starts from its fallback
//! and refuses writes until a readable value or a reset arrives.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::callback_registry::Subscription;
use super::events::StoreEvent;
use crate::error::{AbideError, Result};
use crate::store::{Store, StoreKey};

/// Options controlling how a binding listens for changes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BindingOptions {
    /// Accept changes written by other contexts.
    pub sync_across_contexts: bool,
}

impl BindingOptions {
    /// Options with cross-context sync enabled.
    pub fn synced() -> Self {
        Self {
            sync_across_contexts: true,
        }
    }
}

/// A live value bound to one store key.
///
/// Dropping the binding releases its subscription.
pub struct Binding<T> {
    key: StoreKey<T>,
    store: Store,
    value: Arc<RwLock<T>>,
    readable: Arc<AtomicBool>,
    options: BindingOptions,
    _subscription: Subscription,
}

impl<T> Binding<T>
where
    T: Serialize + DeserializeOwned + Clone + Send + Sync + 'static,
{
    /// Bind `key` with default options (same-context sync only).
    pub fn open(store: &Store, key: StoreKey<T>, fallback: T) -> Self {
        Self::open_with(store, key, fallback, BindingOptions::default())
    }

    /// Bind `key`, reading its current value or `fallback`.
    pub fn open_with(store: &Store, key: StoreKey<T>, fallback: T, options: BindingOptions) -> Self {
        let (initial, readable) = match store.try_read(key) {
            Ok(value) => (value.unwrap_or_else(|| fallback.clone()), true),
            Err(_) => (fallback.clone(), false),
        };
        let value = Arc::new(RwLock::new(initial));
        let readable = Arc::new(AtomicBool::new(readable));

        let target = Arc::clone(&value);
        let target_readable = Arc::clone(&readable);
        let subscription = store.subscribe(
            key,
            Arc::new(move |event| {
                apply_event(&target, &target_readable, &fallback, key, options, event)
            }),
        );

        Self {
            key,
            store: store.clone(),
            value,
            readable,
            options,
            _subscription: subscription,
        }
    }

    /// The bound key.
    pub fn key(&self) -> StoreKey<T> {
        self.key
    }

    /// The store this binding writes through.
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// The options this binding was opened with.
    pub fn options(&self) -> BindingOptions {
        self.options
    }

    /// Whether the slot held readable data when last seen.
    ///
    /// While false, [`try_set`](Self::try_set) refuses to write.
    pub fn is_readable(&self) -> bool {
        self.readable.load(Ordering::Acquire)
    }

    /// A clone of the current value.
    pub fn get(&self) -> T {
        self.value
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Borrow the current value.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        let value = self.value.read().unwrap_or_else(PoisonError::into_inner);
        f(&value)
    }

    /// Replace the value, persist it and notify the other bindings.
    ///
    /// The local value is updated first, so a read right after `set` sees the
    /// new value even if persisting fails; a failed write is logged.
    pub fn set(&self, value: T) {
        if let Err(e) = self.try_set(value) {
            log::error!("Error setting key \"{}\": {}", self.key, e);
        }
    }

    /// Like [`set`](Self::set), but returns the persistence error to the caller.
    ///
    /// Over a slot this binding could not read, nothing changes and
    /// [`AbideError::UnreadableSlot`] is returned. Otherwise the local value
    /// keeps the new value even if persisting fails.
    pub fn try_set(&self, value: T) -> Result<()> {
        if !self.is_readable() {
            return Err(AbideError::UnreadableSlot {
                key: self.key.name().to_string(),
            });
        }
        *self.value.write().unwrap_or_else(PoisonError::into_inner) = value.clone();
        self.store.write(self.key, &value)
    }

    /// Compute a new value from the current one and [`set`](Self::set) it.
    pub fn update(&self, f: impl FnOnce(&T) -> T) -> T {
        let next = self.with(f);
        self.set(next.clone());
        next
    }
}

fn apply_event<T: DeserializeOwned + Clone>(
    target: &RwLock<T>,
    readable: &AtomicBool,
    fallback: &T,
    key: StoreKey<T>,
    options: BindingOptions,
    event: &StoreEvent,
) {
    let next = match event {
        StoreEvent::ValueChanged { value, .. } => match serde_json::from_value(value.clone()) {
            Ok(next) => next,
            Err(e) => {
                log::warn!("Ignoring value for key \"{}\" of unexpected shape: {}", key, e);
                readable.store(false, Ordering::Release);
                return;
            }
        },
        StoreEvent::ExternalChange {
            new_value: Some(raw),
            ..
        } if options.sync_across_contexts => match serde_json::from_str(raw) {
            Ok(next) => next,
            Err(e) => {
                log::warn!(
                    "Failed to parse value for key \"{}\" from another context: {}",
                    key,
                    e
                );
                readable.store(false, Ordering::Release);
                return;
            }
        },
        StoreEvent::ExternalChange { .. } => return,
        StoreEvent::Reset { .. } => fallback.clone(),
    };
    *target.write().unwrap_or_else(PoisonError::into_inner) = next;
    readable.store(true, Ordering::Release);
}

impl<T: fmt::Debug> fmt::Debug for Binding<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("key", &self.key)
            .field("value", &self.value)
            .field("readable", &self.readable)
            .field("options", &self.options)
            .finish()
    }
}
