//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces that the core domain expects from infrastructure.
//! They contain no implementation details and use only domain types.

pub mod entry_store;
pub mod process_signal;

pub use entry_store::{EntryStore, StoreError};
pub use process_signal::ProcessSignaler;
