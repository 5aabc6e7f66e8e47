//! In-memory storage medium.
//!
//! Handles created with [`InMemoryStorage::open_context`] share one storage
//! area, so tests can model several tabs writing to the same origin.

use std::collections::{HashMap, VecDeque};
use std::io::Result;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use super::{KeyValueStorage, StorageChange};

type ContextId = u64;

#[derive(Debug, Default)]
struct SharedArea {
    items: RwLock<HashMap<String, String>>,
    /// Pending change signals per open context.
    queues: Mutex<HashMap<ContextId, VecDeque<StorageChange>>>,
    next_context: AtomicU64,
}

impl SharedArea {
    fn register(&self) -> ContextId {
        let id = self.next_context.fetch_add(1, Ordering::SeqCst);
        self.queues
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, VecDeque::new());
        id
    }

    fn broadcast(&self, from: ContextId, change: StorageChange) {
        let mut queues = self.queues.lock().unwrap_or_else(PoisonError::into_inner);
        for (id, queue) in queues.iter_mut() {
            if *id != from {
                queue.push_back(change.clone());
            }
        }
    }
}

#[derive(Debug)]
struct ContextHandle {
    id: ContextId,
    area: Arc<SharedArea>,
}

impl Drop for ContextHandle {
    fn drop(&mut self) {
        self.area
            .queues
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.id);
    }
}

/// An in-memory key-value medium.
///
/// Cloning yields another handle for the *same* context; use
/// [`open_context`](Self::open_context) for a sibling context that receives
/// this one's change signals.
#[derive(Debug, Clone)]
pub struct InMemoryStorage {
    context: Arc<ContextHandle>,
}

impl InMemoryStorage {
    /// Create a new empty storage area with a single context.
    pub fn new() -> Self {
        let area = Arc::new(SharedArea::default());
        let id = area.register();
        Self {
            context: Arc::new(ContextHandle { id, area }),
        }
    }

    /// Open another context on the same storage area.
    pub fn open_context(&self) -> Self {
        let area = Arc::clone(&self.context.area);
        let id = area.register();
        Self {
            context: Arc::new(ContextHandle { id, area }),
        }
    }

    /// Add an item without emitting change signals (builder pattern, for tests).
    pub fn with_item(self, key: &str, value: &str) -> Self {
        self.context
            .area
            .items
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
        self
    }
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStorage for InMemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let items = self
            .context
            .area
            .items
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let previous = self
            .context
            .area
            .items
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());

        // Like the browser, an unchanged value raises no signal
        if previous.as_deref() != Some(value) {
            self.context
                .area
                .broadcast(self.context.id, StorageChange::written(key, value));
        }
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        let previous = self
            .context
            .area
            .items
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);

        if previous.is_some() {
            self.context
                .area
                .broadcast(self.context.id, StorageChange::removed(key));
        }
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        let items = self
            .context
            .area
            .items
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        let mut keys: Vec<String> = items.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }

    fn take_external_changes(&self) -> Vec<StorageChange> {
        let mut queues = self
            .context
            .area
            .queues
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        queues
            .get_mut(&self.context.id)
            .map(|queue| queue.drain(..).collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let storage = InMemoryStorage::new();
        storage.set_item("gracePoints", "3").unwrap();
        assert_eq!(storage.get_item("gracePoints").unwrap().as_deref(), Some("3"));
        assert_eq!(storage.get_item("missing").unwrap(), None);
    }

    #[test]
    fn test_writer_does_not_see_own_signal() {
        let tab_a = InMemoryStorage::new();
        let tab_b = tab_a.open_context();

        tab_a.set_item("gracePoints", "1").unwrap();

        assert!(tab_a.take_external_changes().is_empty());
        assert_eq!(
            tab_b.take_external_changes(),
            vec![StorageChange::written("gracePoints", "1")]
        );
        // Drained
        assert!(tab_b.take_external_changes().is_empty());
    }

    #[test]
    fn test_clone_shares_context() {
        let tab_a = InMemoryStorage::new();
        let same_tab = tab_a.clone();
        let tab_b = tab_a.open_context();

        same_tab.set_item("k", "v").unwrap();
        assert!(tab_a.take_external_changes().is_empty());
        assert_eq!(tab_b.take_external_changes().len(), 1);
    }

    #[test]
    fn test_unchanged_value_raises_no_signal() {
        let tab_a = InMemoryStorage::new();
        let tab_b = tab_a.open_context();

        tab_a.set_item("k", "v").unwrap();
        tab_a.set_item("k", "v").unwrap();

        assert_eq!(tab_b.take_external_changes().len(), 1);
    }

    #[test]
    fn test_remove_signals_none() {
        let tab_a = InMemoryStorage::new().with_item("k", "v");
        let tab_b = tab_a.open_context();

        tab_a.remove_item("k").unwrap();
        tab_a.remove_item("k").unwrap();

        assert_eq!(
            tab_b.take_external_changes(),
            vec![StorageChange::removed("k")]
        );
    }

    #[test]
    fn test_keys_sorted() {
        let storage = InMemoryStorage::new()
            .with_item("prayerItems", "[]")
            .with_item("gracePoints", "0");
        assert_eq!(storage.keys().unwrap(), vec!["gracePoints", "prayerItems"]);
    }
}
