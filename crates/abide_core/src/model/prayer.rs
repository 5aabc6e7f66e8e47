use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::{Comment, Commentable, InsertPolicy, Likeable, Record, contains_lowercase};
use crate::date::today_iso;

/// A prayer request.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "camelCase", default)]
pub struct PrayerItem {
    /// Unique id.
    pub id: String,
    /// Short title.
    pub title: String,
    /// Who the prayer is for.
    pub person: String,
    /// The request itself.
    pub content: String,
    /// Date the request was made, `YYYY-MM-DD`.
    pub prayer_date: String,
    /// Whether the prayer has been answered.
    pub answered: bool,
    /// Date the prayer was marked answered.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub answered_date: Option<String>,
    /// How God answered.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub gods_response: Option<String>,
    /// Like counter.
    pub likes: i64,
    /// Whether the user liked the item.
    pub liked: bool,
    /// Comment thread.
    pub comments: Vec<Comment>,
}

impl PrayerItem {
    /// Mark the prayer answered or unanswered.
    ///
    /// `answered_date` becomes today on a false → true transition and is
    /// cleared on true → false. Setting the current state again changes nothing.
    pub fn set_answered(&mut self, answered: bool) {
        if answered == self.answered {
            return;
        }
        self.answered = answered;
        self.answered_date = answered.then(today_iso);
    }
}

/// Prayer list status filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "camelCase")]
pub enum PrayerFilter {
    /// Every item.
    #[default]
    All,
    /// Still praying.
    Unanswered,
    /// Answered prayers.
    Answered,
    /// Items with at least one comment.
    Commented,
    /// Liked items.
    Liked,
}

impl Record for PrayerItem {
    type Filter = PrayerFilter;
    const INSERT_POLICY: InsertPolicy = InsertPolicy::Append;

    fn id(&self) -> &str {
        &self.id
    }

    fn sort_date(&self) -> &str {
        &self.prayer_date
    }

    fn matches_search(&self, needle: &str) -> bool {
        contains_lowercase(&self.person, needle)
            || contains_lowercase(&self.title, needle)
            || contains_lowercase(&self.content, needle)
            || self
                .gods_response
                .as_deref()
                .is_some_and(|r| contains_lowercase(r, needle))
    }

    fn matches_filter(&self, filter: &PrayerFilter) -> bool {
        match filter {
            PrayerFilter::All => true,
            PrayerFilter::Unanswered => !self.answered,
            PrayerFilter::Answered => self.answered,
            PrayerFilter::Commented => !self.comments.is_empty(),
            PrayerFilter::Liked => self.liked,
        }
    }
}

impl Commentable for PrayerItem {
    fn comments(&self) -> &[Comment] {
        &self.comments
    }

    fn comments_mut(&mut self) -> &mut Vec<Comment> {
        &mut self.comments
    }
}

impl Likeable for PrayerItem {
    fn like_state(&mut self) -> (&mut bool, &mut i64) {
        (&mut self.liked, &mut self.likes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answered_date_transitions() {
        let mut item = PrayerItem::default();
        item.set_answered(true);
        assert_eq!(item.answered_date.as_deref(), Some(today_iso().as_str()));

        item.answered_date = Some("2020-01-01".into());
        item.set_answered(true);
        assert_eq!(item.answered_date.as_deref(), Some("2020-01-01"));

        item.set_answered(false);
        assert!(!item.answered);
        assert!(item.answered_date.is_none());
    }

    #[test]
    fn test_search_includes_gods_response() {
        let item = PrayerItem {
            person: "Mom".into(),
            gods_response: Some("Healed completely".into()),
            ..Default::default()
        };
        assert!(item.matches_search("mom"));
        assert!(item.matches_search("healed"));
        assert!(!item.matches_search("job"));
    }

    #[test]
    fn test_status_filters() {
        let mut item = PrayerItem::default();
        assert!(item.matches_filter(&PrayerFilter::Unanswered));
        assert!(!item.matches_filter(&PrayerFilter::Answered));
        item.set_answered(true);
        assert!(item.matches_filter(&PrayerFilter::Answered));
        assert!(!item.matches_filter(&PrayerFilter::Commented));
    }
}
