//! In-memory entry store.

use async_trait::async_trait;
use devlog_core::{EntryStore, LogEntry, StoreError};
use tokio::sync::RwLock;
use tracing::debug;

/// Entry store backed by a `RwLock<Vec<LogEntry>>`.
///
/// Nothing survives the process. Useful for router tests and for embedding
/// the collector where no file should be written.
#[derive(Default)]
pub struct MemoryEntryStore {
    entries: RwLock<Vec<LogEntry>>,
}

impl MemoryEntryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries currently held.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl EntryStore for MemoryEntryStore {
    async fn append(&self, entries: Vec<LogEntry>) -> Result<(), StoreError> {
        let mut all = self.entries.write().await;
        debug!(added = entries.len(), "Appending log entries in memory");
        all.extend(entries);
        Ok(())
    }

    async fn read_all(&self) -> Vec<LogEntry> {
        self.entries.read().await.clone()
    }

    async fn clear(&self) -> Result<(), StoreError> {
        self.entries.write().await.clear();
        Ok(())
    }
}
