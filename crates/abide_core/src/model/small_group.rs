use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::{InsertPolicy, Record, contains_lowercase, deserialize_chapter};

/// What the user shared at a small-group meeting.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "camelCase", default)]
pub struct SmallGroupShare {
    /// Unique id.
    pub id: String,
    /// Meeting date, `YYYY-MM-DD`.
    pub date: String,
    /// Name of the group.
    pub group_name: String,
    /// Bible book discussed.
    pub book: String,
    /// Chapter discussed.
    #[serde(deserialize_with = "deserialize_chapter")]
    pub chapter: u32,
    /// Verse or verse range.
    pub verse: String,
    /// Discussion topic.
    pub topic: String,
    /// What the user shared.
    pub my_share: String,
}

impl Record for SmallGroupShare {
    type Filter = ();
    const INSERT_POLICY: InsertPolicy = InsertPolicy::Prepend;

    fn id(&self) -> &str {
        &self.id
    }

    fn sort_date(&self) -> &str {
        &self.date
    }

    fn matches_search(&self, needle: &str) -> bool {
        contains_lowercase(&self.group_name, needle)
            || contains_lowercase(&self.book, needle)
            || contains_lowercase(&self.topic, needle)
            || contains_lowercase(&self.my_share, needle)
    }

    fn matches_filter(&self, _filter: &()) -> bool {
        true
    }
}
