//! Locations of the files a dev-log instance owns.
//!
//! All three files live side by side in one data directory:
//! - `dev-logs.json`: the entry document
//! - `pid.txt`: decimal process id of the running instance
//! - `port.txt`: decimal port the running instance is bound to

use std::path::{Path, PathBuf};

/// File name of the entry document.
pub const LOG_FILE_NAME: &str = "dev-logs.json";

/// File name of the process id record.
pub const PID_FILE_NAME: &str = "pid.txt";

/// File name of the port record.
pub const PORT_FILE_NAME: &str = "port.txt";

/// Resolved file locations inside a data directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DevLogPaths {
    root: PathBuf,
}

impl DevLogPaths {
    /// Resolve paths relative to `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The data directory itself.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn log_file(&self) -> PathBuf {
        self.root.join(LOG_FILE_NAME)
    }

    pub fn pid_file(&self) -> PathBuf {
        self.root.join(PID_FILE_NAME)
    }

    pub fn port_file(&self) -> PathBuf {
        self.root.join(PORT_FILE_NAME)
    }
}
