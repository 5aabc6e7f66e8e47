use std::path::PathBuf;

use thiserror::Error;

/// Unified error type for abide operations
#[derive(Debug, Error)]
pub enum AbideError {
    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read key '{key}': {source}")]
    StorageRead {
        key: String,
        source: std::io::Error,
    },

    #[error("Failed to write key '{key}': {source}")]
    StorageWrite {
        key: String,
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Key '{key}' holds data that could not be read; it was left unchanged")]
    UnreadableSlot { key: String },

    // Record errors
    #[error("No record with id '{id}' in '{key}'")]
    NotFound { key: String, id: String },

    #[error("Comment text must not be empty")]
    EmptyComment,

    #[error("Invalid date: '{0}'. Use the YYYY-MM-DD format")]
    InvalidDate(String),

    // Card errors
    #[error(transparent)]
    Draw(#[from] crate::cards::DrawError),

    // Import errors
    #[error("Import failed: {0}")]
    ImportFailed(String),

    // Config errors
    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Config serialize error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Result type alias for abide operations
pub type Result<T> = std::result::Result<T, AbideError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unreadable_slot_names_key() {
        let err = AbideError::UnreadableSlot {
            key: "journalEntries".to_string(),
        };
        assert!(err.to_string().contains("journalEntries"));
        assert!(err.to_string().contains("left unchanged"));
    }
}
