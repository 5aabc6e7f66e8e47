//! Persisted record types.
//!
//! Every collection record implements [`Record`], which is all the
//! [`CollectionController`](crate::collection::CollectionController) needs:
//! an id, a sortable date, search and status filtering, and where new records
//! go. Journal entries and prayer items additionally carry comments and likes
//! ([`Commentable`], [`Likeable`]).
//!
//! Field names are camelCase on the wire. Deserialization is lenient: fields
//! missing from older data take their defaults, and collections are read
//! through [`RecordList`], so a single unreadable record never causes the
//! whole collection to be discarded.

mod card;
mod journal;
mod message_note;
mod prayer;
mod progress;
mod record_list;
mod small_group;

pub use card::{CardContent, JesusSaidCard};
pub use journal::{JournalEntry, JournalFilter, JournalStatus};
pub use message_note::{MessageNote, NoteFilter, all_tags, parse_tags};
pub use prayer::{PrayerFilter, PrayerItem};
pub use progress::{PlanProgress, TrackerProgress};
pub use record_list::RecordList;
pub use small_group::SmallGroupShare;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;

use crate::date::now_timestamp;
use crate::error::{AbideError, Result};

/// Where [`CollectionController::save`](crate::collection::CollectionController::save)
/// puts a record whose id is not in the collection yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertPolicy {
    /// Add at the end.
    Append,
    /// Add at the front.
    Prepend,
    /// Add at the end, then re-sort the whole collection by date, newest first.
    AppendSorted,
    /// Add at the front, then re-sort the whole collection by date, newest first.
    PrependSorted,
}

impl InsertPolicy {
    /// Whether the collection is re-sorted after an insert.
    pub fn resorts(self) -> bool {
        matches!(self, Self::AppendSorted | Self::PrependSorted)
    }
}

/// A record stored in a collection key.
pub trait Record: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Status filter understood by [`matches_filter`](Self::matches_filter).
    type Filter: Default + Clone + Send + Sync;

    /// Placement of newly saved records.
    const INSERT_POLICY: InsertPolicy;

    /// The record's unique id within its collection.
    fn id(&self) -> &str;

    /// The `YYYY-MM-DD` date views sort by.
    fn sort_date(&self) -> &str;

    /// Whether any searchable field contains `needle`.
    ///
    /// `needle` is already lowercased and non-empty.
    fn matches_search(&self, needle: &str) -> bool;

    /// Whether the record passes the status filter.
    fn matches_filter(&self, filter: &Self::Filter) -> bool;
}

/// A comment attached to a journal entry or prayer item.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "camelCase", default)]
pub struct Comment {
    /// Unique id within the parent's comments.
    pub id: String,
    /// Comment text, trimmed.
    pub text: String,
    /// RFC 3339 creation timestamp.
    pub created_at: String,
}

impl Comment {
    /// Create a comment stamped with the current time.
    ///
    /// Fails with [`AbideError::EmptyComment`] when `text` is blank.
    pub fn new(text: &str) -> Result<Self> {
        let text = text.trim();
        if text.is_empty() {
            return Err(AbideError::EmptyComment);
        }
        Ok(Self {
            id: new_id(),
            text: text.to_string(),
            created_at: now_timestamp(),
        })
    }
}

/// Records that own a comment thread.
pub trait Commentable {
    /// The comments, in insertion order.
    fn comments(&self) -> &[Comment];

    /// Mutable access to the comments.
    fn comments_mut(&mut self) -> &mut Vec<Comment>;
}

/// Records with a single-user like toggle.
pub trait Likeable {
    /// The `liked` flag and the `likes` counter.
    fn like_state(&mut self) -> (&mut bool, &mut i64);

    /// Flip `liked` and move `likes` by one in the same direction.
    fn toggle_like(&mut self) {
        let (liked, likes) = self.like_state();
        if *liked {
            *likes -= 1;
        } else {
            *likes += 1;
        }
        *liked = !*liked;
    }
}

/// Generate a new record id (UUID v4).
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

pub(crate) fn contains_lowercase(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

/// Chapters are numbers, but older data may hold them as numeric strings.
pub(crate) fn deserialize_chapter<'de, D>(deserializer: D) -> std::result::Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Chapter {
        Number(u32),
        Text(String),
    }

    match Chapter::deserialize(deserializer)? {
        Chapter::Number(n) => Ok(n),
        Chapter::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comment_trims_text() {
        let comment = Comment::new("  Amen  ").unwrap();
        assert_eq!(comment.text, "Amen");
        assert!(!comment.id.is_empty());
        assert!(!comment.created_at.is_empty());
    }

    #[test]
    fn test_comment_rejects_blank() {
        assert!(matches!(Comment::new(" \n\t"), Err(AbideError::EmptyComment)));
    }

    #[test]
    fn test_comment_ids_are_unique() {
        let a = Comment::new("a").unwrap();
        let b = Comment::new("b").unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_insert_policy_resorts() {
        assert!(InsertPolicy::PrependSorted.resorts());
        assert!(InsertPolicy::AppendSorted.resorts());
        assert!(!InsertPolicy::Append.resorts());
    }
}
