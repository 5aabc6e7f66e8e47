//! Application entry point: one store, and the controllers built on it.

use crate::backup::{ExportDocument, Importer};
use crate::bridge::BindingOptions;
use crate::cards::CardDeck;
use crate::collection::CollectionController;
use crate::error::Result;
use crate::journal::{JournalController, open_journal};
use crate::keys::{MESSAGE_NOTES, PRAYER_ITEMS, SMALL_GROUP_SHARES};
use crate::model::{CardContent, MessageNote, PrayerItem, SmallGroupShare};
use crate::plans::Plans;
use crate::storage::{InMemoryStorage, KeyValueStorage};
use crate::store::Store;
use crate::tracker::Tracker;

/// Prayer list controller.
pub type PrayerController = CollectionController<PrayerItem>;
/// Message notes controller.
pub type NotesController = CollectionController<MessageNote>;
/// Small-group shares controller.
pub type SharesController = CollectionController<SmallGroupShare>;

/// A store plus the binding options every controller opened from it uses.
#[derive(Debug, Clone)]
pub struct Abide {
    store: Store,
    options: BindingOptions,
}

impl Abide {
    /// Wrap a storage medium.
    pub fn new(storage: impl KeyValueStorage + 'static, options: BindingOptions) -> Self {
        Self {
            store: Store::new(storage),
            options,
        }
    }

    /// A process-local instance, mostly for tests and embedding.
    pub fn in_memory() -> Self {
        Self::new(InMemoryStorage::new(), BindingOptions::default())
    }

    /// Open the directory medium named by `config`.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_config(config: &crate::config::Config) -> Result<Self> {
        let storage = crate::storage::DirectoryStorage::open(&config.data_dir)?;
        let options = BindingOptions {
            sync_across_contexts: config.sync_across_contexts,
        };
        log::debug!("Opened data directory {:?}", config.data_dir);
        Ok(Self::new(storage, options))
    }

    /// The underlying store.
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Binding options used by every controller.
    pub fn options(&self) -> BindingOptions {
        self.options
    }

    /// The journal.
    pub fn journal(&self) -> JournalController {
        open_journal(&self.store, self.options)
    }

    /// The prayer list.
    pub fn prayers(&self) -> PrayerController {
        CollectionController::open(&self.store, PRAYER_ITEMS, self.options)
    }

    /// Sermon notes.
    pub fn notes(&self) -> NotesController {
        CollectionController::open(&self.store, MESSAGE_NOTES, self.options)
    }

    /// Small-group shares.
    pub fn shares(&self) -> SharesController {
        CollectionController::open(&self.store, SMALL_GROUP_SHARES, self.options)
    }

    /// Devotional cards drawn from `pool`.
    pub fn cards(&self, pool: Vec<CardContent>) -> CardDeck {
        CardDeck::open(&self.store, pool, self.options)
    }

    /// The Bible reading tracker.
    pub fn tracker(&self) -> Tracker {
        Tracker::open(&self.store, self.options)
    }

    /// Reading-plan progress.
    pub fn plans(&self) -> Plans {
        Plans::open(&self.store, self.options)
    }

    /// Snapshot every key for export.
    pub fn export(&self) -> ExportDocument {
        ExportDocument::from_store(&self.store)
    }

    /// An importer over this store.
    pub fn importer(&self) -> Importer {
        Importer::new(&self.store)
    }

    /// Forward writes made by other contexts to the open bindings.
    pub fn poll_external(&self) -> usize {
        self.store.poll_external()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::GRACE_POINTS;

    #[test]
    fn test_controllers_share_one_store() {
        let app = Abide::in_memory();
        let mut journal = app.journal();
        let deck = app.cards(Vec::new());

        journal
            .save(crate::model::JournalEntry {
                id: "j".into(),
                date: "2024-01-01".into(),
                book: "Ruth".into(),
                chapter: 1,
                completed: true,
                ..Default::default()
            })
            .unwrap();

        assert_eq!(deck.points(), 1);
        assert!(app.tracker().progress().is_read("Ruth", 1));
        assert_eq!(app.store().read(GRACE_POINTS, 0), 1);
    }

    #[test]
    fn test_from_config_uses_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config = crate::config::Config::new(dir.path().join("data"));
        let app = Abide::from_config(&config).unwrap();
        app.plans().complete_day("p", 1).unwrap();
        assert!(dir.path().join("data").join("biblePlansProgress.json").exists());
        assert!(app.options().sync_across_contexts);
    }
}
