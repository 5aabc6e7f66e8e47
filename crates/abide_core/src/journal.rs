//! Journal collection and the progress it drives.
//!
//! Saving or deleting journal entries keeps two other keys in step:
//!
//! - `bibleTrackerProgress[book][chapter]` is true exactly when some entry for
//!   that chapter is completed. Only the chapters touched by the change are
//!   recomputed, so manual tracker toggles elsewhere survive.
//! - `gracePoints` grows by one each time an entry becomes completed.
//!
//! Neither key is written while it holds data that cannot be read.

use std::collections::BTreeSet;

use crate::bridge::BindingOptions;
use crate::collection::{CollectionController, DerivedState};
use crate::error::Result;
use crate::keys::{BIBLE_TRACKER_PROGRESS, GRACE_POINTS, JOURNAL_ENTRIES};
use crate::model::{JournalEntry, TrackerProgress};
use crate::store::Store;

/// Journal list controller.
pub type JournalController = CollectionController<JournalEntry, JournalProgress>;

/// Open the journal collection.
pub fn open_journal(store: &Store, options: BindingOptions) -> JournalController {
    CollectionController::with_hook(store, JOURNAL_ENTRIES, options, JournalProgress)
}

/// Derived state of the journal: titles, tracker progress and grace points.
#[derive(Debug, Clone, Copy, Default)]
pub struct JournalProgress;

impl JournalProgress {
    fn recompute<'a>(
        store: &Store,
        chapters: impl IntoIterator<Item = (&'a str, u32)>,
        entries: &[JournalEntry],
    ) -> Result<()> {
        let chapters: BTreeSet<(&str, u32)> = chapters
            .into_iter()
            .filter(|(book, chapter)| !book.is_empty() && *chapter > 0)
            .collect();
        if chapters.is_empty() {
            return Ok(());
        }

        let mut progress: TrackerProgress =
            store.try_read(BIBLE_TRACKER_PROGRESS)?.unwrap_or_default();
        for (book, chapter) in chapters {
            let read = entries
                .iter()
                .any(|e| e.completed && e.book == book && e.chapter == chapter);
            progress.set(book, chapter, read);
        }
        store.write(BIBLE_TRACKER_PROGRESS, &progress)
    }
}

impl DerivedState<JournalEntry> for JournalProgress {
    fn before_save(&self, entry: JournalEntry) -> JournalEntry {
        entry.with_derived_title()
    }

    fn after_save(
        &self,
        store: &Store,
        previous: Option<&JournalEntry>,
        saved: &JournalEntry,
        records: &[JournalEntry],
    ) -> Result<()> {
        let was_completed = previous.is_some_and(|p| p.completed);
        if saved.completed && !was_completed {
            let points = store.try_read(GRACE_POINTS)?.unwrap_or(0);
            store.write(GRACE_POINTS, &(points + 1))?;
            log::debug!("Entry {} completed, grace points now {}", saved.id, points + 1);
        }

        let mut touched = vec![(saved.book.as_str(), saved.chapter)];
        if let Some(previous) = previous {
            touched.push((previous.book.as_str(), previous.chapter));
        }
        Self::recompute(store, touched, records)
    }

    fn after_delete(
        &self,
        store: &Store,
        deleted: &[JournalEntry],
        remaining: &[JournalEntry],
    ) -> Result<()> {
        let touched = deleted
            .iter()
            .filter(|e| e.completed)
            .map(|e| (e.book.as_str(), e.chapter));
        Self::recompute(store, touched, remaining)
    }
}

/// Distinct books across `entries`, sorted, for the book filter.
pub fn journal_books(entries: &[JournalEntry]) -> Vec<String> {
    entries
        .iter()
        .map(|e| e.book.clone())
        .filter(|b| !b.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
