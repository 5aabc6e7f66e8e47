//! Store events carried by the sync bridge.
//!
//! Every event names the key it concerns; subscribers filter on that key.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Events emitted by the store when a persisted slot changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(tag = "type")]
pub enum StoreEvent {
    /// A value was written in this context.
    ValueChanged {
        /// Key of the written slot.
        key: String,
        /// The written value.
        value: serde_json::Value,
    },

    /// Another context changed the slot in the shared medium.
    ExternalChange {
        /// Key of the changed slot.
        key: String,
        /// The new serialized value, or `None` when the slot was removed.
        #[serde(default)]
        new_value: Option<String>,
    },

    /// The slot is missing or unreadable; bindings fall back to their default.
    Reset {
        /// Key of the slot.
        key: String,
    },
}

impl StoreEvent {
    /// Create a ValueChanged event.
    pub fn value_changed(key: impl Into<String>, value: serde_json::Value) -> Self {
        Self::ValueChanged {
            key: key.into(),
            value,
        }
    }

    /// Create an ExternalChange event.
    pub fn external_change(key: impl Into<String>, new_value: Option<String>) -> Self {
        Self::ExternalChange {
            key: key.into(),
            new_value,
        }
    }

    /// Create a Reset event.
    pub fn reset(key: impl Into<String>) -> Self {
        Self::Reset { key: key.into() }
    }

    /// The key this event concerns.
    pub fn key(&self) -> &str {
        match self {
            Self::ValueChanged { key, .. } => key,
            Self::ExternalChange { key, .. } => key,
            Self::Reset { key } => key,
        }
    }

    /// Get the event type as a string.
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::ValueChanged { .. } => "ValueChanged",
            Self::ExternalChange { .. } => "ExternalChange",
            Self::Reset { .. } => "Reset",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_changed_event() {
        let event = StoreEvent::value_changed("gracePoints", serde_json::json!(3));
        assert_eq!(event.key(), "gracePoints");
        assert_eq!(event.event_type(), "ValueChanged");
    }

    #[test]
    fn test_external_change_event() {
        let event = StoreEvent::external_change("prayerItems", Some("[]".to_string()));
        assert_eq!(event.key(), "prayerItems");
        assert_eq!(event.event_type(), "ExternalChange");
    }

    #[test]
    fn test_event_serialization() {
        let event = StoreEvent::value_changed("messageNotes", serde_json::json!([]));

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("ValueChanged"));
        assert!(json.contains("messageNotes"));

        let parsed: StoreEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, event);
    }
}
