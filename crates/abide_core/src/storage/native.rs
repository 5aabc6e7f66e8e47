//! Directory-backed storage medium.
//!
//! Only available on non-WASM targets.

use std::collections::HashMap;
use std::fs;
use std::io::{Error, ErrorKind, Result};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use super::{KeyValueStorage, StorageChange};

const EXTENSION: &str = "json";

/// Stores each key as `<dir>/<key>.json`.
///
/// Every handle remembers the content it last saw for each key. Polling
/// [`take_external_changes`](KeyValueStorage::take_external_changes) rescans
/// the directory and reports keys whose content differs from that snapshot,
/// which are exactly the writes made by other processes or handles.
#[derive(Debug)]
pub struct DirectoryStorage {
    dir: PathBuf,
    seen: Mutex<HashMap<String, String>>,
}

impl DirectoryStorage {
    /// Open (and create if needed) a storage directory.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        let storage = Self {
            dir,
            seen: Mutex::new(HashMap::new()),
        };
        let snapshot = storage.scan()?;
        *storage.seen.lock().unwrap_or_else(PoisonError::into_inner) = snapshot;
        Ok(storage)
    }

    /// The directory holding the key files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                format!("Invalid storage key: {:?}", key),
            ));
        }
        Ok(self.dir.join(format!("{}.{}", key, EXTENSION)))
    }

    fn scan(&self) -> Result<HashMap<String, String>> {
        let mut items = HashMap::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == EXTENSION)
                && let Some(key) = path.file_stem().and_then(|s| s.to_str())
            {
                // A file can vanish between listing and reading
                match fs::read_to_string(&path) {
                    Ok(content) => {
                        items.insert(key.to_string(), content);
                    }
                    Err(e) if e.kind() == ErrorKind::NotFound => {}
                    Err(e) => return Err(e),
                }
            }
        }
        Ok(items)
    }

    fn remember(&self, key: &str, value: Option<&str>) {
        let mut seen = self.seen.lock().unwrap_or_else(PoisonError::into_inner);
        match value {
            Some(value) => {
                seen.insert(key.to_string(), value.to_string());
            }
            None => {
                seen.remove(key);
            }
        }
    }
}

impl KeyValueStorage for DirectoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        // Write to a sibling temp file first so readers never see a torn value
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        self.remember(key, Some(value));
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e),
        }
        self.remember(key, None);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        let mut keys: Vec<String> = self.scan()?.into_keys().collect();
        keys.sort();
        Ok(keys)
    }

    fn take_external_changes(&self) -> Vec<StorageChange> {
        let current = match self.scan() {
            Ok(current) => current,
            Err(e) => {
                log::error!("Failed to scan storage directory {:?}: {}", self.dir, e);
                return Vec::new();
            }
        };

        let mut seen = self.seen.lock().unwrap_or_else(PoisonError::into_inner);
        let mut changes = Vec::new();

        for (key, value) in &current {
            if seen.get(key) != Some(value) {
                changes.push(StorageChange::written(key.clone(), value.clone()));
            }
        }
        for key in seen.keys() {
            if !current.contains_key(key) {
                changes.push(StorageChange::removed(key.clone()));
            }
        }

        changes.sort_by(|a, b| a.key.cmp(&b.key));
        *seen = current;
        changes
    }
}
