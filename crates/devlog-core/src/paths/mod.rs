//! Path utilities for the dev-log data directory.
//!
//! # Design
//!
//! - Returns `PathBuf` and `PathError` for clear error handling
//! - Every path is derived from one root directory; nothing is global

mod ensure;
mod error;
mod files;

pub use ensure::ensure_directory;
pub use error::PathError;
pub use files::{DevLogPaths, LOG_FILE_NAME, PID_FILE_NAME, PORT_FILE_NAME};
