//! File-backed entry store.
//!
//! The whole collection lives in one JSON array, pretty-printed with
//! 2-space indentation. Every append rewrites the document.

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use devlog_core::{EntryStore, LogEntry, StoreError};
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Entry store persisted as a single JSON document.
///
/// Appends are read-modify-write cycles serialized through one mutex, so
/// overlapping requests never overwrite each other's entries. Writes go to
/// a sibling temp file that is renamed into place, so `read_all` never
/// observes a half-written document and does not need the lock.
pub struct FileEntryStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileEntryStore {
    /// Create a store backed by the document at `path`.
    ///
    /// Nothing is touched on disk until the first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Location of the backing document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(".tmp");
        PathBuf::from(name)
    }

    async fn load(&self) -> Vec<LogEntry> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => decode(&self.path, &bytes),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Failed to read log document, treating as empty");
                Vec::new()
            }
        }
    }

    async fn write_document(&self, contents: &[u8]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| StoreError::io(parent, e))?;
            }
        }

        let temp_path = self.temp_path();
        tokio::fs::write(&temp_path, contents)
            .await
            .map_err(|e| StoreError::io(&temp_path, e))?;
        tokio::fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| StoreError::io(&self.path, e))
    }
}

fn decode(path: &Path, bytes: &[u8]) -> Vec<LogEntry> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Vec::new();
    }

    match serde_json::from_slice(bytes) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Log document is corrupt, treating as empty");
            Vec::new()
        }
    }
}

#[async_trait]
impl EntryStore for FileEntryStore {
    async fn append(&self, entries: Vec<LogEntry>) -> Result<(), StoreError> {
        if entries.is_empty() {
            return Ok(());
        }

        let _guard = self.write_lock.lock().await;

        let added = entries.len();
        let mut all = self.load().await;
        all.extend(entries);

        let encoded =
            serde_json::to_vec_pretty(&all).map_err(|e| StoreError::Serialization(e.to_string()))?;
        self.write_document(&encoded).await?;

        debug!(added, total = all.len(), path = %self.path.display(), "Appended log entries");
        Ok(())
    }

    async fn read_all(&self) -> Vec<LogEntry> {
        self.load().await
    }

    async fn clear(&self) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;

        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                debug!(path = %self.path.display(), "Removed log document");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::io(&self.path, e)),
        }
    }
}
