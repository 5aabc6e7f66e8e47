use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::JournalEntry;

/// Bible reading progress: book → chapter → read.
///
/// Books with no chapters left are removed, so no empty book maps persist.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(transparent)]
pub struct TrackerProgress(pub BTreeMap<String, BTreeMap<u32, bool>>);

impl TrackerProgress {
    /// Rebuild progress from the completed entries of a journal.
    pub fn from_entries<'a>(entries: impl IntoIterator<Item = &'a JournalEntry>) -> Self {
        let mut progress = Self::default();
        for entry in entries {
            if entry.completed && !entry.book.is_empty() && entry.chapter > 0 {
                progress.set(&entry.book, entry.chapter, true);
            }
        }
        progress
    }

    /// Whether a chapter is marked read.
    pub fn is_read(&self, book: &str, chapter: u32) -> bool {
        self.0
            .get(book)
            .and_then(|chapters| chapters.get(&chapter))
            .copied()
            .unwrap_or(false)
    }

    /// Mark a chapter read, or clear it and prune the book if it becomes empty.
    pub fn set(&mut self, book: &str, chapter: u32, read: bool) {
        if read {
            self.0
                .entry(book.to_string())
                .or_default()
                .insert(chapter, true);
            return;
        }
        if let Some(chapters) = self.0.get_mut(book) {
            chapters.remove(&chapter);
            if chapters.is_empty() {
                self.0.remove(book);
            }
        }
    }

    /// Flip a chapter. Returns whether it is now read.
    pub fn toggle(&mut self, book: &str, chapter: u32) -> bool {
        let read = !self.is_read(book, chapter);
        self.set(book, chapter, read);
        read
    }

    /// The chapters of `book` marked read, ascending.
    pub fn read_chapters(&self, book: &str) -> Vec<u32> {
        self.0
            .get(book)
            .map(|chapters| {
                chapters
                    .iter()
                    .filter(|(_, read)| **read)
                    .map(|(chapter, _)| *chapter)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Books with at least one chapter entry.
    pub fn books(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Total chapters marked read across all books.
    pub fn completed_chapters(&self) -> usize {
        self.0
            .values()
            .flat_map(|chapters| chapters.values())
            .filter(|read| **read)
            .count()
    }

    /// Percentage of `total_chapters` read. Zero when `total_chapters` is zero.
    pub fn percentage(&self, total_chapters: usize) -> f64 {
        if total_chapters == 0 {
            return 0.0;
        }
        self.completed_chapters() as f64 / total_chapters as f64 * 100.0
    }

    /// Whether nothing is marked.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Reading-plan progress: plan id → day → done.
///
/// A plan's map is kept after its last day is cleared.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(transparent)]
pub struct PlanProgress(pub BTreeMap<String, BTreeMap<u32, bool>>);

impl PlanProgress {
    /// Whether a day of a plan is done.
    pub fn is_done(&self, plan_id: &str, day: u32) -> bool {
        self.0
            .get(plan_id)
            .and_then(|days| days.get(&day))
            .copied()
            .unwrap_or(false)
    }

    /// Flip a day. Returns whether it is now done.
    pub fn toggle_day(&mut self, plan_id: &str, day: u32) -> bool {
        let days = self.0.entry(plan_id.to_string()).or_default();
        if days.get(&day).copied().unwrap_or(false) {
            days.remove(&day);
            false
        } else {
            days.insert(day, true);
            true
        }
    }

    /// Mark a day done.
    pub fn complete_day(&mut self, plan_id: &str, day: u32) {
        self.0
            .entry(plan_id.to_string())
            .or_default()
            .insert(day, true);
    }

    /// Number of days done in a plan.
    pub fn completed_days(&self, plan_id: &str) -> usize {
        self.0
            .get(plan_id)
            .map(|days| days.values().filter(|done| **done).count())
            .unwrap_or(0)
    }

    /// Ids of plans with recorded progress.
    pub fn plans(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}
