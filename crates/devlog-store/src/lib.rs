//! Entry store implementations for dev-log.
//!
//! - [`FileEntryStore`]: the production store, one pretty-printed JSON
//!   document on disk
//! - [`MemoryEntryStore`]: same contract in memory, for tests and embedding

#![deny(unsafe_code)]

mod file_store;
mod memory_store;

pub use file_store::FileEntryStore;
pub use memory_store::MemoryEntryStore;
