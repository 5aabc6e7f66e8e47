//! Storage medium abstraction module.
//!
//! This module provides the [`KeyValueStorage`] trait: a flat, string-keyed,
//! string-valued durable medium (the shape of a browser's local storage).
//! The typed layer on top of it lives in [`crate::store`].
//!
//! ## Media
//!
//! - [`InMemoryStorage`]: process-local medium. Several handles opened with
//!   [`InMemoryStorage::open_context`] share one storage area and behave like
//!   separate browser tabs: each sees change signals written by the others.
//! - [`DirectoryStorage`]: one `<key>.json` file per key in a directory.
//!   Changes written by other processes are detected when polled.
//!
//! ## Change signals
//!
//! A medium may report writes made by *other* execution contexts through
//! [`KeyValueStorage::take_external_changes`]. The writer itself never sees
//! its own writes there. Media with no notion of other contexts keep the
//! default implementation, which reports nothing.

mod memory;
#[cfg(not(target_arch = "wasm32"))]
mod native;

pub use memory::InMemoryStorage;
#[cfg(not(target_arch = "wasm32"))]
pub use native::DirectoryStorage;

use std::io::Result;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A change observed in the shared medium, written by another context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "camelCase")]
pub struct StorageChange {
    /// The key that changed.
    pub key: String,
    /// The new serialized value, or `None` when the key was removed.
    pub new_value: Option<String>,
}

impl StorageChange {
    /// Create a change signal for a written value.
    pub fn written(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            new_value: Some(value.into()),
        }
    }

    /// Create a change signal for a removed key.
    pub fn removed(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            new_value: None,
        }
    }
}

/// Abstraction over a durable string-keyed storage medium.
///
/// Send + Sync required so a store can be shared between threads
/// (e.g. a desktop shell calling into the core).
pub trait KeyValueStorage: Send + Sync {
    /// Returns the stored string for `key`, or `None` if the key is absent.
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Removes `key`. Removing an absent key is not an error.
    fn remove_item(&self, key: &str) -> Result<()>;

    /// Lists every key currently present.
    fn keys(&self) -> Result<Vec<String>>;

    /// Drains change signals written by other contexts since the last call.
    fn take_external_changes(&self) -> Vec<StorageChange> {
        Vec::new()
    }
}

// Blanket implementation for references to KeyValueStorage
impl<T: KeyValueStorage> KeyValueStorage for &T {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        (*self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        (*self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        (*self).remove_item(key)
    }

    fn keys(&self) -> Result<Vec<String>> {
        (*self).keys()
    }

    fn take_external_changes(&self) -> Vec<StorageChange> {
        (*self).take_external_changes()
    }
}

impl<T: KeyValueStorage + ?Sized> KeyValueStorage for Arc<T> {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        (**self).remove_item(key)
    }

    fn keys(&self) -> Result<Vec<String>> {
        (**self).keys()
    }

    fn take_external_changes(&self) -> Vec<StorageChange> {
        (**self).take_external_changes()
    }
}
