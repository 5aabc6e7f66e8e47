#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

/// Application entry point
pub mod app;

/// Export and import of the whole store
pub mod backup;

/// Same-context and cross-context sync of store keys
pub mod bridge;

/// Devotional card draws
pub mod cards;

/// Generic list controller
pub mod collection;

/// Configuration options
pub mod config;

/// Date parsing and formatting
pub mod date;

/// Error (common error types)
pub mod error;

/// Journal collection and derived progress
pub mod journal;

/// Persisted key names
pub mod keys;

/// Persisted record types
pub mod model;

/// Reading-plan progress
pub mod plans;

/// Storage media
pub mod storage;

/// Typed keyed store
pub mod store;

/// Bible reading tracker
pub mod tracker;

pub use app::Abide;
pub use error::{AbideError, Result};
pub use store::{Store, StoreKey};
