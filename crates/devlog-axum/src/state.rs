//! Shared application state type.

use std::sync::Arc;

use devlog_core::{DEFAULT_MAX_BODY_BYTES, EntryStore};

/// Everything a handler needs.
pub struct AppContext {
    /// Where accepted entries go and where reads come from.
    pub store: Arc<dyn EntryStore>,
    /// Ingestion body ceiling in bytes.
    pub max_body_bytes: usize,
}

impl AppContext {
    /// Context with the default 10 MiB body ceiling.
    pub fn new(store: Arc<dyn EntryStore>) -> Self {
        Self {
            store,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }

    /// Override the body ceiling.
    #[must_use]
    pub const fn with_max_body_bytes(mut self, max_body_bytes: usize) -> Self {
        self.max_body_bytes = max_body_bytes;
        self
    }
}

/// Application state shared across all handlers.
pub type AppState = Arc<AppContext>;
