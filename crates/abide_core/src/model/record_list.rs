use serde::de::DeserializeOwned;
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::store::StoreKey;

/// A stored collection, read one record at a time.
///
/// Items that do not deserialize as `T` are kept as raw JSON and written back
/// after the readable records, so replacing the records never discards them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordList<T> {
    records: Vec<T>,
    unreadable: Vec<Value>,
}

impl<T> Default for RecordList<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            unreadable: Vec::new(),
        }
    }
}

impl<T> RecordList<T> {
    /// The same slot as `key`, read leniently.
    pub fn key(key: StoreKey<Vec<T>>) -> StoreKey<RecordList<T>> {
        StoreKey::new(key.name())
    }

    /// The readable records, in stored order.
    pub fn records(&self) -> &[T] {
        &self.records
    }

    /// Stored items that could not be read as `T`.
    pub fn unreadable(&self) -> &[Value] {
        &self.unreadable
    }

    /// Replace the readable records, keeping the unreadable items.
    pub fn with_records(&self, records: Vec<T>) -> Self {
        Self {
            records,
            unreadable: self.unreadable.clone(),
        }
    }
}

impl<T: DeserializeOwned> RecordList<T> {
    /// Split raw stored items into records and unreadable items.
    pub fn from_values(values: Vec<Value>) -> Self {
        let mut list = Self::default();
        for (index, value) in values.into_iter().enumerate() {
            match serde_json::from_value::<T>(value.clone()) {
                Ok(record) => list.records.push(record),
                Err(e) => {
                    log::warn!("Keeping unreadable record at index {}: {}", index, e);
                    list.unreadable.push(value);
                }
            }
        }
        list
    }
}

impl<T: Serialize> Serialize for RecordList<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.records.len() + self.unreadable.len()))?;
        for record in &self.records {
            seq.serialize_element(record)?;
        }
        for value in &self.unreadable {
            seq.serialize_element(value)?;
        }
        seq.end()
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for RecordList<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let values = Vec::<Value>::deserialize(deserializer)?;
        Ok(Self::from_values(values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::JournalEntry;
    use serde_json::json;

    #[test]
    fn test_bad_record_does_not_hide_good_ones() {
        let list: RecordList<JournalEntry> = serde_json::from_value(json!([
            {"id": "good", "date": "2024-01-01"},
            {"id": "bad", "date": "2024-01-02", "comments": null}
        ]))
        .unwrap();

        assert_eq!(list.records().len(), 1);
        assert_eq!(list.records()[0].id, "good");
        assert_eq!(list.unreadable()[0]["id"], "bad");
    }

    #[test]
    fn test_unreadable_items_are_written_back() {
        let list: RecordList<JournalEntry> =
            serde_json::from_value(json!([{"id": "bad", "comments": null}])).unwrap();
        let list = list.with_records(vec![JournalEntry {
            id: "new".into(),
            ..Default::default()
        }]);

        let written = serde_json::to_value(&list).unwrap();
        let ids: Vec<_> = written
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["new", "bad"]);
        assert_eq!(written[1]["comments"], Value::Null);
    }

    #[test]
    fn test_non_array_is_an_error() {
        assert!(serde_json::from_value::<RecordList<JournalEntry>>(json!({"id": "x"})).is_err());
    }
}
