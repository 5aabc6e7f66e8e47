use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::{InsertPolicy, Record, contains_lowercase};

/// A collected devotional card.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "camelCase", default)]
pub struct JesusSaidCard {
    /// Unique id.
    pub id: String,
    /// Date drawn, `YYYY-MM-DD`.
    pub date: String,
    /// Verse reference and text.
    pub verse: String,
    /// Devotional message.
    pub message: String,
    /// Suggested prayer.
    pub prayer: String,
}

impl JesusSaidCard {
    /// Materialize a card drawn from `content` on `date`.
    pub fn from_content(content: &CardContent, date: impl Into<String>) -> Self {
        Self {
            id: super::new_id(),
            date: date.into(),
            verse: content.verse.clone(),
            message: content.message.clone(),
            prayer: content.prayer.clone(),
        }
    }
}

/// One entry of the static card pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct CardContent {
    /// Verse reference and text; identifies the card.
    pub verse: String,
    /// Devotional message.
    pub message: String,
    /// Suggested prayer.
    pub prayer: String,
}

impl Record for JesusSaidCard {
    type Filter = ();
    const INSERT_POLICY: InsertPolicy = InsertPolicy::AppendSorted;

    fn id(&self) -> &str {
        &self.id
    }

    fn sort_date(&self) -> &str {
        &self.date
    }

    fn matches_search(&self, needle: &str) -> bool {
        contains_lowercase(&self.verse, needle)
            || contains_lowercase(&self.message, needle)
            || contains_lowercase(&self.prayer, needle)
    }

    fn matches_filter(&self, _filter: &()) -> bool {
        true
    }
}
