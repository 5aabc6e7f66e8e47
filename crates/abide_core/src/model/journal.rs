use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::{
    Comment, Commentable, InsertPolicy, Likeable, Record, contains_lowercase, deserialize_chapter,
};

/// A devotional journal entry for one chapter.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "camelCase", default)]
pub struct JournalEntry {
    /// Unique id.
    pub id: String,
    /// Entry date, `YYYY-MM-DD`.
    pub date: String,
    /// Bible book name.
    pub book: String,
    /// Chapter number.
    #[serde(deserialize_with = "deserialize_chapter")]
    pub chapter: u32,
    /// Verse or verse range within the chapter.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub verse: Option<String>,
    /// Display title, derived on save.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub title: Option<String>,
    /// Passages that stood out.
    pub highlights: String,
    /// What God said through the reading.
    pub god_message: String,
    /// Whether the whole chapter was read and meditated on.
    pub completed: bool,
    /// Like counter.
    pub likes: i64,
    /// Whether the user liked the entry.
    pub liked: bool,
    /// Comment thread.
    pub comments: Vec<Comment>,
}

impl JournalEntry {
    /// The title shown for the entry: `"<book> <chapter>"` plus `":<verse>"`
    /// when a verse is set.
    pub fn derived_title(&self) -> String {
        match self.verse.as_deref().filter(|v| !v.is_empty()) {
            Some(verse) => format!("{} {}:{}", self.book, self.chapter, verse),
            None => format!("{} {}", self.book, self.chapter),
        }
    }

    /// Set [`title`](Self::title) from book, chapter and verse.
    pub fn with_derived_title(mut self) -> Self {
        self.title = Some(self.derived_title());
        self
    }
}

/// Journal status filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "camelCase")]
pub enum JournalStatus {
    /// Every entry.
    #[default]
    All,
    /// Entries with at least one comment.
    Commented,
    /// Liked entries.
    Liked,
    /// Entries whose highlights are still blank.
    PendingMeditation,
}

/// Journal view filter.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JournalFilter {
    /// Status filter.
    pub status: JournalStatus,
    /// Only entries for this book.
    pub book: Option<String>,
}

impl Record for JournalEntry {
    type Filter = JournalFilter;
    const INSERT_POLICY: InsertPolicy = InsertPolicy::Append;

    fn id(&self) -> &str {
        &self.id
    }

    fn sort_date(&self) -> &str {
        &self.date
    }

    fn matches_search(&self, needle: &str) -> bool {
        contains_lowercase(&self.book, needle)
            || self.chapter.to_string().contains(needle)
            || contains_lowercase(&self.highlights, needle)
    }

    fn matches_filter(&self, filter: &JournalFilter) -> bool {
        if let Some(book) = &filter.book
            && &self.book != book
        {
            return false;
        }
        match filter.status {
            JournalStatus::All => true,
            JournalStatus::Commented => !self.comments.is_empty(),
            JournalStatus::Liked => self.liked,
            JournalStatus::PendingMeditation => self.highlights.trim().is_empty(),
        }
    }
}

impl Commentable for JournalEntry {
    fn comments(&self) -> &[Comment] {
        &self.comments
    }

    fn comments_mut(&mut self) -> &mut Vec<Comment> {
        &mut self.comments
    }
}

impl Likeable for JournalEntry {
    fn like_state(&mut self) -> (&mut bool, &mut i64) {
        (&mut self.liked, &mut self.likes)
    }
}
