//! The persisted slots of the application.

use crate::model::{
    JesusSaidCard, JournalEntry, MessageNote, PlanProgress, PrayerItem, SmallGroupShare,
    TrackerProgress,
};
use crate::store::StoreKey;

/// Journal entries, in insertion order.
pub const JOURNAL_ENTRIES: StoreKey<Vec<JournalEntry>> = StoreKey::new("journalEntries");
/// Prayer requests, in insertion order.
pub const PRAYER_ITEMS: StoreKey<Vec<PrayerItem>> = StoreKey::new("prayerItems");
/// Collected devotional cards, newest first.
pub const JESUS_SAID_CARDS: StoreKey<Vec<JesusSaidCard>> = StoreKey::new("jesusSaidCards");
/// Sermon notes, newest first.
pub const MESSAGE_NOTES: StoreKey<Vec<MessageNote>> = StoreKey::new("messageNotes");
/// Small-group shares, most recently added first.
pub const SMALL_GROUP_SHARES: StoreKey<Vec<SmallGroupShare>> = StoreKey::new("smallGroupShares");
/// Reading-plan progress: plan id → day → done.
pub const BIBLE_PLANS_PROGRESS: StoreKey<PlanProgress> = StoreKey::new("biblePlansProgress");
/// Bible reading progress: book → chapter → read.
pub const BIBLE_TRACKER_PROGRESS: StoreKey<TrackerProgress> =
    StoreKey::new("bibleTrackerProgress");
/// Points spent on card draws.
pub const GRACE_POINTS: StoreKey<i64> = StoreKey::new("gracePoints");

/// Every persisted key, in export order.
pub const ALL_KEYS: [&str; 8] = [
    JOURNAL_ENTRIES.name(),
    PRAYER_ITEMS.name(),
    JESUS_SAID_CARDS.name(),
    MESSAGE_NOTES.name(),
    SMALL_GROUP_SHARES.name(),
    BIBLE_PLANS_PROGRESS.name(),
    BIBLE_TRACKER_PROGRESS.name(),
    GRACE_POINTS.name(),
];
