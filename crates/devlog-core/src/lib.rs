//! Core domain types and port definitions for dev-log.
//!
//! This crate has no knowledge of HTTP, signals or concrete storage. Adapters
//! (`devlog-store`, `devlog-runtime`, `devlog-axum`) implement or consume the
//! ports defined here.

#![deny(unsafe_code)]

pub mod domain;
pub mod paths;
pub mod ports;
pub mod settings;

// Re-export commonly used types for convenience
pub use domain::{InvalidEntry, LogEntry, is_valid_entry, normalize_payload, validate_batch};
pub use paths::{DevLogPaths, PathError, ensure_directory};
pub use ports::{EntryStore, ProcessSignaler, StoreError};
pub use settings::{
    DEFAULT_MAX_BODY_BYTES, DEFAULT_SELF_CHECK_TIMEOUT, DEFAULT_SHUTDOWN_TIMEOUT,
    DEFAULT_TAKEOVER_GRACE, SERVICE_NAME,
};
