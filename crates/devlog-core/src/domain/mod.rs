//! Domain types for dev-log.
//!
//! Pure data and predicates; no I/O.

mod entry;

pub use entry::{InvalidEntry, LogEntry, is_valid_entry, normalize_payload, validate_batch};
