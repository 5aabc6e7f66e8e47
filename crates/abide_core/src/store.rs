//! Typed persistent keyed store.
//!
//! A [`Store`] wraps a [`KeyValueStorage`] medium and a
//! [`CallbackRegistry`]. Values are serialized as JSON, one document per key.
//!
//! - [`Store::read`] never fails: a missing or corrupt slot yields the
//!   caller's fallback (corruption is logged). [`Store::try_read`] reports
//!   the corrupt case instead.
//! - [`Store::write`] persists and then notifies every subscriber of the key,
//!   whether or not the value actually changed.
//! - [`Store::poll_external`] forwards change signals written by other
//!   contexts into the registry.
//!
//! Cloning a store is cheap; clones share the medium and the registry.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::bridge::{CallbackRegistry, EventCallback, StoreEvent, Subscription};
use crate::error::{AbideError, Result};
use crate::storage::KeyValueStorage;

/// The name of a persisted slot together with the type stored in it.
pub struct StoreKey<T> {
    name: &'static str,
    _marker: PhantomData<fn() -> T>,
}

impl<T> StoreKey<T> {
    /// Declare a typed key.
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _marker: PhantomData,
        }
    }

    /// The raw key name used in the medium.
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl<T> Clone for StoreKey<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for StoreKey<T> {}

impl<T> fmt::Debug for StoreKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("StoreKey").field(&self.name).finish()
    }
}

impl<T> fmt::Display for StoreKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// A typed, change-notifying view over a storage medium.
#[derive(Clone)]
pub struct Store {
    storage: Arc<dyn KeyValueStorage>,
    registry: Arc<CallbackRegistry>,
}

impl Store {
    /// Create a store over `storage` with a fresh event registry.
    pub fn new(storage: impl KeyValueStorage + 'static) -> Self {
        Self {
            storage: Arc::new(storage),
            registry: Arc::new(CallbackRegistry::new()),
        }
    }

    /// The underlying medium.
    pub fn storage(&self) -> &dyn KeyValueStorage {
        self.storage.as_ref()
    }

    /// The event registry shared by every binding of this store.
    pub fn registry(&self) -> &Arc<CallbackRegistry> {
        &self.registry
    }

    /// Read a typed value, falling back when the slot is missing or unreadable.
    pub fn read<T: DeserializeOwned>(&self, key: StoreKey<T>, fallback: T) -> T {
        self.try_read(key).ok().flatten().unwrap_or(fallback)
    }

    /// Read a typed value, distinguishing a missing slot (`Ok(None)`) from one
    /// holding data of the wrong shape ([`AbideError::UnreadableSlot`]).
    ///
    /// Callers that write the key back use this instead of [`read`](Self::read)
    /// so unreadable data is never replaced by a fallback.
    pub fn try_read<T: DeserializeOwned>(&self, key: StoreKey<T>) -> Result<Option<T>> {
        let Some(raw) = self.read_raw(key.name()) else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                log::error!("Error reading key \"{}\": {}", key, e);
                Err(AbideError::UnreadableSlot {
                    key: key.name().to_string(),
                })
            }
        }
    }

    /// Read the raw string stored under `name`, logging medium failures.
    pub fn read_raw(&self, name: &str) -> Option<String> {
        match self.storage.get_item(name) {
            Ok(raw) => raw,
            Err(source) => {
                let err = AbideError::StorageRead {
                    key: name.to_string(),
                    source,
                };
                log::error!("{}", err);
                None
            }
        }
    }

    /// Read the slot under `name` as an untyped JSON value.
    pub fn read_value(&self, name: &str) -> Option<serde_json::Value> {
        let raw = self.read_raw(name)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                log::error!("Error reading key \"{}\": {}", name, e);
                None
            }
        }
    }

    /// Serialize and persist `value`, then notify every binding of the key.
    pub fn write<T: Serialize>(&self, key: StoreKey<T>, value: &T) -> Result<()> {
        let value = serde_json::to_value(value)?;
        self.write_value(key.name(), value)
    }

    /// Persist an untyped JSON value under `name`, then notify.
    pub fn write_value(&self, name: &str, value: serde_json::Value) -> Result<()> {
        let raw = serde_json::to_string(&value)?;
        self.storage
            .set_item(name, &raw)
            .map_err(|source| AbideError::StorageWrite {
                key: name.to_string(),
                source,
            })?;
        log::debug!("Wrote key \"{}\" ({} bytes)", name, raw.len());
        self.registry.emit(&StoreEvent::value_changed(name, value));
        Ok(())
    }

    /// Subscribe to events for `key` for as long as the returned guard lives.
    pub fn subscribe<T>(&self, key: StoreKey<T>, callback: EventCallback) -> Subscription {
        Subscription::new(&self.registry, key.name(), callback)
    }

    /// Forward change signals from other contexts to subscribers.
    ///
    /// Returns the number of signals forwarded.
    pub fn poll_external(&self) -> usize {
        let changes = self.storage.take_external_changes();
        for change in &changes {
            log::debug!("External change for key \"{}\"", change.key);
            self.registry.emit(&StoreEvent::external_change(
                change.key.clone(),
                change.new_value.clone(),
            ));
        }
        changes.len()
    }

    /// Re-read every key in `names` and push the persisted state to every binding.
    pub fn reload<'a>(&self, names: impl IntoIterator<Item = &'a str>) {
        for name in names {
            let event = match self.read_value(name) {
                Some(value) => StoreEvent::value_changed(name, value),
                None => StoreEvent::reset(name),
            };
            self.registry.emit(&event);
        }
    }
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}
