//! Export and import of the whole store as one JSON document.
//!
//! Export writes every persisted key. Import applies a per-key policy:
//!
//! | Key | Policy |
//! |---|---|
//! | `gracePoints` | overwrite when the imported value is an integer |
//! | `biblePlansProgress` | overwrite when the imported value is a progress map |
//! | the five record arrays | merge by id, imported record wins |
//! | `bibleTrackerProgress` | rebuilt from the merged journal |
//!
//! Every new value is computed before anything is written, so a document that
//! fails to parse leaves the store exactly as it was.
//!
//! Collections are merged as raw JSON: stored items that no longer read as
//! records are exported and kept through a merge like any other item.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use futures_lite::io::{AsyncRead, AsyncReadExt};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use ts_rs::TS;

use crate::error::{AbideError, Result};
use crate::keys::{
    ALL_KEYS, BIBLE_PLANS_PROGRESS, BIBLE_TRACKER_PROGRESS, GRACE_POINTS, JESUS_SAID_CARDS,
    JOURNAL_ENTRIES, MESSAGE_NOTES, PRAYER_ITEMS, SMALL_GROUP_SHARES,
};
use crate::model::{
    JesusSaidCard, JournalEntry, MessageNote, PlanProgress, PrayerItem, Record, RecordList,
    SmallGroupShare, TrackerProgress,
};
use crate::store::{Store, StoreKey};

// ============================================================================
// Export
// ============================================================================

/// The backup document: every persisted key, with defaults for missing ones.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    /// Journal entries.
    #[ts(as = "Vec<JournalEntry>")]
    pub journal_entries: RecordList<JournalEntry>,
    /// Prayer requests.
    #[ts(as = "Vec<PrayerItem>")]
    pub prayer_items: RecordList<PrayerItem>,
    /// Collected devotional cards.
    #[ts(as = "Vec<JesusSaidCard>")]
    pub jesus_said_cards: RecordList<JesusSaidCard>,
    /// Sermon notes.
    #[ts(as = "Vec<MessageNote>")]
    pub message_notes: RecordList<MessageNote>,
    /// Small-group shares.
    #[ts(as = "Vec<SmallGroupShare>")]
    pub small_group_shares: RecordList<SmallGroupShare>,
    /// Reading-plan progress.
    pub bible_plans_progress: PlanProgress,
    /// Bible reading progress.
    pub bible_tracker_progress: TrackerProgress,
    /// Grace points.
    pub grace_points: i64,
}

impl ExportDocument {
    /// Read every key from `store`.
    pub fn from_store(store: &Store) -> Self {
        Self {
            journal_entries: read_records(store, JOURNAL_ENTRIES),
            prayer_items: read_records(store, PRAYER_ITEMS),
            jesus_said_cards: read_records(store, JESUS_SAID_CARDS),
            message_notes: read_records(store, MESSAGE_NOTES),
            small_group_shares: read_records(store, SMALL_GROUP_SHARES),
            bible_plans_progress: store.read(BIBLE_PLANS_PROGRESS, PlanProgress::default()),
            bible_tracker_progress: store.read(BIBLE_TRACKER_PROGRESS, TrackerProgress::default()),
            grace_points: store.read(GRACE_POINTS, 0),
        }
    }

    /// Pretty-printed JSON (two-space indent).
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn read_records<T: Record>(store: &Store, key: StoreKey<Vec<T>>) -> RecordList<T> {
    store.read(RecordList::key(key), RecordList::default())
}

/// `Abide-backup-YYYY-MM-DD.json` for `date`.
pub fn backup_file_name(date: &NaiveDate) -> String {
    format!("Abide-backup-{}.json", date.format("%Y-%m-%d"))
}

/// Export `store` as JSON text.
pub fn export_json(store: &Store) -> Result<String> {
    ExportDocument::from_store(store).to_json()
}

/// Export `store` into `dir` under today's backup file name.
///
/// Returns the path written.
pub fn export_to_dir(store: &Store, dir: &Path) -> Result<PathBuf> {
    let today = chrono::Local::now().date_naive();
    let path = dir.join(backup_file_name(&today));
    std::fs::create_dir_all(dir)?;
    std::fs::write(&path, export_json(store)?)?;
    log::info!("Exported backup to {:?}", path);
    Ok(path)
}

// ============================================================================
// Import
// ============================================================================

/// Where an import is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum ImportPhase {
    /// Nothing in progress. A failed import comes back here.
    #[default]
    Idle,
    /// Reading the file.
    Reading,
    /// Parsing and validating the document.
    Parsing,
    /// Writing merged values to the store.
    Applying,
    /// Done; every binding has been reloaded.
    Succeeded,
}

/// What an import changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    /// Keys written, in write order.
    pub updated_keys: Vec<String>,
    /// Records across all merged collections after the merge.
    pub merged_records: usize,
    /// Imported records dropped for lacking an id or having an unreadable shape.
    pub dropped_records: usize,
}

struct PendingWrite {
    key: &'static str,
    value: Value,
}

/// Parse import text into its top-level object.
pub fn parse_document(text: &str) -> Result<Map<String, Value>> {
    let value: Value = serde_json::from_str(text)
        .map_err(|e| AbideError::ImportFailed(format!("Invalid JSON: {}", e)))?;
    match value {
        Value::Object(map) => Ok(map),
        other => Err(AbideError::ImportFailed(format!(
            "Expected a JSON object at the top level, found {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Identity of a stored item during a merge.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum MergeKey {
    Id(String),
    /// Existing item without a usable id, kept at its position.
    Anonymous(usize),
}

/// Merge imported records into the raw `existing` items by id.
///
/// Existing items are kept in their stored order whether or not they still
/// read as `T`. An imported record replaces the existing item with the same
/// id in place, or is appended. Imported records without a non-empty string
/// id, or that do not read as `T`, are dropped and counted.
pub fn merge_by_id<T: Record>(
    existing: Vec<Value>,
    imported: &[Value],
) -> Result<(Vec<Value>, usize)> {
    let mut merged: IndexMap<MergeKey, Value> = IndexMap::new();
    let mut dropped = 0;

    for (index, item) in existing.into_iter().enumerate() {
        let key = match item_id(&item) {
            Some(id) => MergeKey::Id(id.to_string()),
            None => MergeKey::Anonymous(index),
        };
        merged.insert(key, item);
    }

    for value in imported {
        if item_id(value).is_none() {
            dropped += 1;
            continue;
        }
        match serde_json::from_value::<T>(value.clone()) {
            Ok(record) => {
                let key = MergeKey::Id(record.id().to_string());
                merged.insert(key, serde_json::to_value(&record)?);
            }
            Err(e) => {
                log::warn!("Dropping imported record of unexpected shape: {}", e);
                dropped += 1;
            }
        }
    }

    Ok((merged.into_values().collect(), dropped))
}

fn item_id(item: &Value) -> Option<&str> {
    item.get("id")
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())
}

/// Computes the writes an import document implies.
struct ImportPlan<'a> {
    store: &'a Store,
    document: &'a Map<String, Value>,
    writes: Vec<PendingWrite>,
    summary: ImportSummary,
}

impl<'a> ImportPlan<'a> {
    fn new(store: &'a Store, document: &'a Map<String, Value>) -> Self {
        Self {
            store,
            document,
            writes: Vec::new(),
            summary: ImportSummary::default(),
        }
    }

    fn push<T: Serialize>(&mut self, key: StoreKey<T>, value: &T) -> Result<()> {
        self.push_value(key.name(), serde_json::to_value(value)?);
        Ok(())
    }

    fn push_value(&mut self, key: &'static str, value: Value) {
        self.writes.push(PendingWrite { key, value });
        self.summary.updated_keys.push(key.to_string());
    }

    /// The raw items stored under `key`, or `None` when the slot holds
    /// something other than an array.
    fn stored_items<T>(&self, key: StoreKey<T>) -> Option<Vec<Value>> {
        let Some(raw) = self.store.read_raw(key.name()) else {
            return Some(Vec::new());
        };
        match serde_json::from_str(&raw) {
            Ok(Value::Array(items)) => Some(items),
            Ok(other) => {
                log::error!("Stored {} is {}, not an array", key, json_kind(&other));
                None
            }
            Err(e) => {
                log::error!("Error reading key \"{}\": {}", key, e);
                None
            }
        }
    }

    fn overwrite_points(&mut self) -> Result<()> {
        match self.document.get(GRACE_POINTS.name()) {
            Some(value) => match value.as_i64() {
                Some(points) => self.push(GRACE_POINTS, &points),
                None => {
                    log::warn!("Skipping gracePoints: not an integer");
                    Ok(())
                }
            },
            None => Ok(()),
        }
    }

    fn overwrite_plans(&mut self) -> Result<()> {
        let Some(value) = self.document.get(BIBLE_PLANS_PROGRESS.name()) else {
            return Ok(());
        };
        match serde_json::from_value::<PlanProgress>(value.clone()) {
            Ok(plans) if value.is_object() => self.push(BIBLE_PLANS_PROGRESS, &plans),
            _ => {
                log::warn!("Skipping biblePlansProgress: not a plan progress map");
                Ok(())
            }
        }
    }

    /// Merge one collection. Returns the merged items, or `None` when the
    /// imported value is present but not an array.
    ///
    /// A stored slot that is not an array is never replaced: the import fails
    /// if the document has records for it and skips the key otherwise.
    fn merge<T: Record>(&mut self, key: StoreKey<Vec<T>>) -> Result<Option<Vec<Value>>> {
        let document = self.document;
        let imported = match document.get(key.name()) {
            None => None,
            Some(Value::Array(items)) => Some(items.as_slice()),
            Some(other) => {
                log::warn!("Skipping {}: expected an array, found {}", key, json_kind(other));
                return Ok(None);
            }
        };

        let Some(existing) = self.stored_items(key) else {
            if imported.is_some() {
                return Err(AbideError::UnreadableSlot {
                    key: key.name().to_string(),
                });
            }
            log::warn!("Skipping {}: stored value is unreadable", key);
            return Ok(None);
        };

        let (merged, dropped) = merge_by_id::<T>(existing, imported.unwrap_or_default())?;
        self.summary.merged_records += merged.len();
        self.summary.dropped_records += dropped;
        self.push_value(key.name(), Value::Array(merged.clone()));
        Ok(Some(merged))
    }

    fn build(mut self) -> Result<(Vec<PendingWrite>, ImportSummary)> {
        self.overwrite_points()?;
        self.overwrite_plans()?;

        let journal = self.merge(JOURNAL_ENTRIES)?;
        self.merge(PRAYER_ITEMS)?;
        self.merge(JESUS_SAID_CARDS)?;
        self.merge(MESSAGE_NOTES)?;
        self.merge(SMALL_GROUP_SHARES)?;

        if let Some(items) = journal {
            let entries = RecordList::<JournalEntry>::from_values(items);
            let progress = TrackerProgress::from_entries(entries.records());
            self.push(BIBLE_TRACKER_PROGRESS, &progress)?;
        }

        Ok((self.writes, self.summary))
    }
}

/// Runs imports against a store and tracks their [`ImportPhase`].
#[derive(Debug)]
pub struct Importer {
    store: Store,
    phase: ImportPhase,
    last_error: Option<String>,
}

impl Importer {
    /// Create an idle importer.
    pub fn new(store: &Store) -> Self {
        Self {
            store: store.clone(),
            phase: ImportPhase::Idle,
            last_error: None,
        }
    }

    /// The current phase.
    pub fn phase(&self) -> ImportPhase {
        self.phase
    }

    /// The message of the most recent failure, kept until the next success.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Return to [`ImportPhase::Idle`] after a success.
    pub fn reset(&mut self) {
        self.phase = ImportPhase::Idle;
    }

    fn enter(&mut self, phase: ImportPhase) {
        log::debug!("Import phase: {:?} -> {:?}", self.phase, phase);
        self.phase = phase;
    }

    fn finish(&mut self, result: Result<ImportSummary>) -> Result<ImportSummary> {
        match &result {
            Ok(summary) => {
                self.store.reload(ALL_KEYS);
                self.last_error = None;
                self.enter(ImportPhase::Succeeded);
                log::info!(
                    "Import succeeded: {} key(s) updated, {} record(s) dropped",
                    summary.updated_keys.len(),
                    summary.dropped_records
                );
            }
            Err(e) => {
                log::error!("Import failed: {}", e);
                self.last_error = Some(e.to_string());
                self.enter(ImportPhase::Idle);
            }
        }
        result
    }

    /// Read a document from `reader` and import it.
    pub async fn import_reader<R: AsyncRead + Unpin>(
        &mut self,
        mut reader: R,
    ) -> Result<ImportSummary> {
        self.enter(ImportPhase::Reading);
        let mut text = String::new();
        if let Err(e) = reader.read_to_string(&mut text).await {
            return self.finish(Err(AbideError::ImportFailed(format!(
                "Could not read the file: {}",
                e
            ))));
        }
        self.import_str(&text)
    }

    /// Import a document already in memory.
    pub fn import_str(&mut self, text: &str) -> Result<ImportSummary> {
        self.enter(ImportPhase::Parsing);
        let planned =
            parse_document(text).and_then(|doc| ImportPlan::new(&self.store, &doc).build());
        let (writes, summary) = match planned {
            Ok(planned) => planned,
            Err(e) => return self.finish(Err(e)),
        };

        self.enter(ImportPhase::Applying);
        for write in writes {
            if let Err(e) = self.store.write_value(write.key, write.value) {
                return self.finish(Err(e));
            }
        }
        self.finish(Ok(summary))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryStorage;
    use serde_json::json;

    fn prayer(id: &str, title: &str) -> PrayerItem {
        PrayerItem {
            id: id.into(),
            title: title.into(),
            prayer_date: "2024-01-01".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_backup_file_name() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(backup_file_name(&date), "Abide-backup-2024-03-09.json");
    }

    #[test]
    fn test_export_has_all_keys_with_defaults() {
        let store = Store::new(InMemoryStorage::new());
        let json: Value = serde_json::from_str(&export_json(&store).unwrap()).unwrap();
        let object = json.as_object().unwrap();
        assert_eq!(object.len(), 8);
        for key in ALL_KEYS {
            assert!(object.contains_key(key), "missing {key}");
        }
        assert_eq!(object["gracePoints"], json!(0));
        assert_eq!(object["bibleTrackerProgress"], json!({}));
        assert_eq!(object["journalEntries"], json!([]));
    }

    #[test]
    fn test_export_is_pretty_printed() {
        let store = Store::new(InMemoryStorage::new());
        let text = export_json(&store).unwrap();
        assert!(text.starts_with("{\n  \""));
    }

    #[test]
    fn test_invalid_json_leaves_store_untouched() {
        let store = Store::new(InMemoryStorage::new());
        store.write(GRACE_POINTS, &4).unwrap();
        let mut importer = Importer::new(&store);

        let err = importer.import_str("{ not json").unwrap_err();
        assert!(matches!(err, AbideError::ImportFailed(_)));
        assert_eq!(importer.phase(), ImportPhase::Idle);
        assert!(importer.last_error().unwrap().contains("Invalid JSON"));
        assert_eq!(store.read(GRACE_POINTS, 0), 4);
        assert_eq!(store.storage().keys().unwrap(), vec!["gracePoints"]);
    }

    #[test]
    fn test_non_object_document_fails() {
        let store = Store::new(InMemoryStorage::new());
        let mut importer = Importer::new(&store);
        assert!(importer.import_str("[1, 2]").is_err());
        assert!(store.storage().keys().unwrap().is_empty());
    }

    #[test]
    fn test_wrong_type_overwrite_keys_are_skipped() {
        let store = Store::new(InMemoryStorage::new());
        store.write(GRACE_POINTS, &7).unwrap();
        let mut importer = Importer::new(&store);

        importer
            .import_str(r#"{"gracePoints": "lots", "biblePlansProgress": [1]}"#)
            .unwrap();
        assert_eq!(store.read(GRACE_POINTS, 0), 7);
        assert!(store.read_raw("biblePlansProgress").is_none());
    }

    fn ids(items: &[Value]) -> Vec<&str> {
        items.iter().map(|v| v["id"].as_str().unwrap_or("")).collect()
    }

    #[test]
    fn test_merge_keeps_order_and_import_wins() {
        let existing = vec![
            serde_json::to_value(prayer("a", "old a")).unwrap(),
            serde_json::to_value(prayer("b", "old b")).unwrap(),
        ];
        let imported = vec![
            json!({"id": "b", "title": "new b", "prayerDate": "2024-01-02"}),
            json!({"id": "c", "title": "c"}),
            json!({"title": "no id"}),
            json!({"id": "", "title": "blank id"}),
            json!({"id": "d", "comments": null}),
        ];
        let (merged, dropped) = merge_by_id::<PrayerItem>(existing, &imported).unwrap();

        assert_eq!(ids(&merged), vec!["a", "b", "c"]);
        assert_eq!(merged[1]["title"], "new b");
        assert_eq!(dropped, 3);
    }

    #[test]
    fn test_merge_keeps_unreadable_existing_items() {
        let existing = vec![
            json!({"id": "good", "date": "2024-01-01"}),
            json!({"id": "bad", "date": "2024-01-02", "comments": null}),
            json!({"title": "no id"}),
        ];
        let imported = vec![json!({"id": "new", "date": "2024-01-03"})];
        let (merged, dropped) = merge_by_id::<JournalEntry>(existing, &imported).unwrap();

        assert_eq!(ids(&merged), vec!["good", "bad", "", "new"]);
        assert_eq!(merged[1]["comments"], Value::Null);
        assert_eq!(dropped, 0);
    }

    #[test]
    fn test_import_keeps_stored_entries_that_do_not_read() {
        let store = Store::new(InMemoryStorage::new().with_item(
            "journalEntries",
            r#"[
                {"id": "good", "date": "2024-01-01", "book": "Ruth", "chapter": 1, "completed": true},
                {"id": "bad", "date": "2024-01-02", "comments": null}
            ]"#,
        ));
        let mut importer = Importer::new(&store);

        importer
            .import_str(r#"{"journalEntries": [{"id": "new", "date": "2024-01-03"}]}"#)
            .unwrap();

        let stored = store.read_value("journalEntries").unwrap();
        assert_eq!(ids(stored.as_array().unwrap()), vec!["good", "bad", "new"]);
        let progress = store.read(BIBLE_TRACKER_PROGRESS, TrackerProgress::default());
        assert!(progress.is_read("Ruth", 1));
    }

    #[test]
    fn test_import_never_replaces_unreadable_collection() {
        let store = Store::new(InMemoryStorage::new().with_item("prayerItems", r#"{"id": "x"}"#));
        store.write(GRACE_POINTS, &3).unwrap();
        let mut importer = Importer::new(&store);

        let err = importer
            .import_str(r#"{"gracePoints": 9, "prayerItems": [{"id": "a"}]}"#)
            .unwrap_err();
        assert!(matches!(err, AbideError::UnreadableSlot { .. }));
        assert_eq!(store.read_raw("prayerItems").as_deref(), Some(r#"{"id": "x"}"#));
        assert_eq!(store.read(GRACE_POINTS, 0), 3);

        // Without records for it, the key is skipped and the rest applies
        importer.import_str(r#"{"gracePoints": 9}"#).unwrap();
        assert_eq!(store.read_raw("prayerItems").as_deref(), Some(r#"{"id": "x"}"#));
        assert_eq!(store.read(GRACE_POINTS, 0), 9);
    }

    #[test]
    fn test_export_includes_unreadable_records() {
        let store = Store::new(InMemoryStorage::new().with_item(
            "prayerItems",
            r#"[{"id": "good"}, {"id": "bad", "comments": null}]"#,
        ));
        let json: Value = serde_json::from_str(&export_json(&store).unwrap()).unwrap();
        assert_eq!(ids(json["prayerItems"].as_array().unwrap()), vec!["good", "bad"]);
    }

    #[test]
    fn test_non_array_collection_is_skipped() {
        let store = Store::new(InMemoryStorage::new());
        store.write(PRAYER_ITEMS, &vec![prayer("a", "keep")]).unwrap();
        let mut importer = Importer::new(&store);

        let summary = importer.import_str(r#"{"prayerItems": {"id": "x"}}"#).unwrap();
        assert!(!summary.updated_keys.contains(&"prayerItems".to_string()));
        assert_eq!(store.read(PRAYER_ITEMS, Vec::new())[0].title, "keep");
    }

    #[test]
    fn test_tracker_rebuilt_from_merged_journal() {
        let store = Store::new(InMemoryStorage::new());
        let mut stale = TrackerProgress::default();
        stale.set("Obadiah", 1, true);
        store.write(BIBLE_TRACKER_PROGRESS, &stale).unwrap();

        let mut importer = Importer::new(&store);
        importer
            .import_str(
                r#"{"journalEntries": [
                    {"id": "j1", "date": "2024-01-01", "book": "John", "chapter": 1, "completed": true},
                    {"id": "j2", "date": "2024-01-02", "book": "John", "chapter": 2, "completed": false}
                ]}"#,
            )
            .unwrap();

        let progress = store.read(BIBLE_TRACKER_PROGRESS, TrackerProgress::default());
        assert!(progress.is_read("John", 1));
        assert!(!progress.is_read("John", 2));
        assert!(!progress.is_read("Obadiah", 1));
        assert_eq!(importer.phase(), ImportPhase::Succeeded);
    }

    #[test]
    fn test_import_reader() {
        let store = Store::new(InMemoryStorage::new());
        let mut importer = Importer::new(&store);
        let reader = futures_lite::io::Cursor::new(br#"{"gracePoints": 12}"#.to_vec());

        let summary = futures_lite::future::block_on(importer.import_reader(reader)).unwrap();
        assert!(summary.updated_keys.contains(&"gracePoints".to_string()));
        assert_eq!(store.read(GRACE_POINTS, 0), 12);
    }

    #[test]
    fn test_success_clears_previous_error() {
        let store = Store::new(InMemoryStorage::new());
        let mut importer = Importer::new(&store);
        let _ = importer.import_str("oops");
        assert!(importer.last_error().is_some());

        importer.import_str("{}").unwrap();
        assert!(importer.last_error().is_none());
        importer.reset();
        assert_eq!(importer.phase(), ImportPhase::Idle);
    }
}
