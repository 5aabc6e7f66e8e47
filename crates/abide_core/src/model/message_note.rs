use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::{InsertPolicy, Record, contains_lowercase};

/// Notes taken during a sermon or message.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "camelCase", default)]
pub struct MessageNote {
    /// Unique id.
    pub id: String,
    /// Date of the message, `YYYY-MM-DD`.
    pub date: String,
    /// Message title.
    pub title: String,
    /// Who preached.
    pub speaker: String,
    /// The notes.
    pub content: String,
    /// Free-form tags.
    pub tags: Vec<String>,
}

/// Message note filter.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NoteFilter {
    /// Only notes carrying this tag.
    pub tag: Option<String>,
}

impl Record for MessageNote {
    type Filter = NoteFilter;
    const INSERT_POLICY: InsertPolicy = InsertPolicy::PrependSorted;

    fn id(&self) -> &str {
        &self.id
    }

    fn sort_date(&self) -> &str {
        &self.date
    }

    fn matches_search(&self, needle: &str) -> bool {
        contains_lowercase(&self.title, needle)
            || contains_lowercase(&self.speaker, needle)
            || contains_lowercase(&self.content, needle)
    }

    fn matches_filter(&self, filter: &NoteFilter) -> bool {
        filter
            .tag
            .as_ref()
            .is_none_or(|tag| self.tags.contains(tag))
    }
}

/// Split comma-separated tag input into trimmed, non-empty tags.
pub fn parse_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// Every distinct tag across `notes`, sorted.
pub fn all_tags(notes: &[MessageNote]) -> Vec<String> {
    notes
        .iter()
        .flat_map(|note| note.tags.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(tags: &[&str]) -> MessageNote {
        MessageNote {
            tags: tags.iter().map(|t| t.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_parse_tags() {
        assert_eq!(parse_tags(" grace, faith ,, hope ,"), vec!["grace", "faith", "hope"]);
        assert!(parse_tags("  ,  ").is_empty());
    }

    #[test]
    fn test_all_tags_sorted_and_distinct() {
        let notes = vec![note(&["hope", "faith"]), note(&["faith", "love"])];
        assert_eq!(all_tags(&notes), vec!["faith", "hope", "love"]);
    }

    #[test]
    fn test_tag_filter() {
        let n = note(&["faith"]);
        assert!(n.matches_filter(&NoteFilter::default()));
        assert!(n.matches_filter(&NoteFilter {
            tag: Some("faith".into())
        }));
        assert!(!n.matches_filter(&NoteFilter {
            tag: Some("hope".into())
        }));
    }
}
