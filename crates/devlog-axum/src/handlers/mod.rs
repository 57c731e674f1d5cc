//! HTTP request handlers.
//!
//! Handlers are thin: ingestion rules live in `devlog_core`, persistence
//! behind the `EntryStore` port.

pub mod logs;
pub mod status;
