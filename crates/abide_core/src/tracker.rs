//! Bible reading tracker.

use serde::Serialize;
use ts_rs::TS;

use crate::bridge::{Binding, BindingOptions};
use crate::error::Result;
use crate::keys::BIBLE_TRACKER_PROGRESS;
use crate::model::TrackerProgress;
use crate::store::Store;

/// Chapters in the 66-book Protestant canon.
pub const TOTAL_BIBLE_CHAPTERS: usize = 1189;

/// Overall reading progress.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "camelCase")]
pub struct TrackerSummary {
    /// Chapters marked read.
    pub completed_chapters: usize,
    /// Chapters in the reference canon.
    pub total_chapters: usize,
    /// `completed_chapters / total_chapters` as a percentage.
    pub percentage: f64,
}

/// Live view of the tracker key with manual chapter toggles.
pub struct Tracker {
    progress: Binding<TrackerProgress>,
}

impl Tracker {
    /// Open the tracker.
    pub fn open(store: &Store, options: BindingOptions) -> Self {
        Self {
            progress: Binding::open_with(
                store,
                BIBLE_TRACKER_PROGRESS,
                TrackerProgress::default(),
                options,
            ),
        }
    }

    /// The current progress.
    pub fn progress(&self) -> TrackerProgress {
        self.progress.get()
    }

    /// Flip one chapter. Returns whether it is now read.
    pub fn toggle_chapter(&self, book: &str, chapter: u32) -> Result<bool> {
        let mut progress = self.progress.get();
        let read = progress.toggle(book, chapter);
        self.progress.try_set(progress)?;
        Ok(read)
    }

    /// Totals against `total_chapters`.
    pub fn summary(&self, total_chapters: usize) -> TrackerSummary {
        self.progress.with(|progress| TrackerSummary {
            completed_chapters: progress.completed_chapters(),
            total_chapters,
            percentage: progress.percentage(total_chapters),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryStorage;

    #[test]
    fn test_toggle_persists_and_prunes() {
        let store = Store::new(InMemoryStorage::new());
        let tracker = Tracker::open(&store, BindingOptions::default());

        assert!(tracker.toggle_chapter("Philemon", 1).unwrap());
        assert!(store.read(BIBLE_TRACKER_PROGRESS, TrackerProgress::default()).is_read("Philemon", 1));

        assert!(!tracker.toggle_chapter("Philemon", 1).unwrap());
        assert_eq!(store.read_raw("bibleTrackerProgress").as_deref(), Some("{}"));
    }

    #[test]
    fn test_summary() {
        let store = Store::new(InMemoryStorage::new());
        let tracker = Tracker::open(&store, BindingOptions::default());
        tracker.toggle_chapter("Jude", 1).unwrap();

        let summary = tracker.summary(TOTAL_BIBLE_CHAPTERS);
        assert_eq!(summary.completed_chapters, 1);
        assert_eq!(summary.total_chapters, 1189);
        assert!((summary.percentage - 100.0 / 1189.0).abs() < 1e-9);
    }
}
