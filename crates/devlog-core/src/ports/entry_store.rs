//! Entry store trait definition.
//!
//! The store owns the durable collection of log entries. Implementations
//! decide where the collection lives; callers only see append, read-all
//! and clear.

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::LogEntry;

/// Errors surfaced by the write side of an [`EntryStore`].
///
/// The read side never fails: an unreadable collection is an empty one.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem failure while writing or removing the backing document.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The collection could not be encoded.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl StoreError {
    /// Wrap an I/O error with the path it occurred on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Append-only collection of log entries.
///
/// # Contract
///
/// - `append` adds the whole batch after the existing entries, or nothing
///   at all when it returns an error.
/// - `read_all` returns the entries in insertion order. A missing, empty or
///   corrupt backing document reads as an empty collection.
/// - `clear` removes every entry and is idempotent.
#[async_trait]
pub trait EntryStore: Send + Sync {
    /// Append a batch of entries.
    async fn append(&self, entries: Vec<LogEntry>) -> Result<(), StoreError>;

    /// Return the full collection.
    async fn read_all(&self) -> Vec<LogEntry>;

    /// Remove the collection.
    async fn clear(&self) -> Result<(), StoreError>;
}
