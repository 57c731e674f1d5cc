//! Shared helpers for devlog-axum integration tests.

#![allow(dead_code)]

use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use devlog_core::{EntryStore, LogEntry, ProcessSignaler, StoreError};

/// Store whose writes always fail.
pub struct FailingStore;

#[async_trait]
impl EntryStore for FailingStore {
    async fn append(&self, _entries: Vec<LogEntry>) -> Result<(), StoreError> {
        Err(StoreError::io(
            "/readonly/dev-logs.json",
            io::Error::from(io::ErrorKind::PermissionDenied),
        ))
    }

    async fn read_all(&self) -> Vec<LogEntry> {
        Vec::new()
    }

    async fn clear(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// How the process behind a recorded pid reacts to signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behavior {
    /// Not running at all.
    Dead,
    /// Exits on `SIGTERM`.
    ExitsOnTerm,
    /// Ignores `SIGTERM`, exits on `SIGKILL`.
    IgnoresTerm,
}

/// Signaler simulating one recorded process and recording every signal sent.
pub struct RecordingSignaler {
    behavior: Behavior,
    alive: AtomicBool,
    terminated: Mutex<Vec<u32>>,
    killed: Mutex<Vec<u32>>,
    witness: Option<PathBuf>,
    witness_seen_at_exit: Mutex<Option<bool>>,
}

impl RecordingSignaler {
    pub fn new(behavior: Behavior) -> Self {
        Self {
            behavior,
            alive: AtomicBool::new(behavior != Behavior::Dead),
            terminated: Mutex::new(Vec::new()),
            killed: Mutex::new(Vec::new()),
            witness: None,
            witness_seen_at_exit: Mutex::new(None),
        }
    }

    /// Note whether `path` exists at the moment the process is seen gone.
    pub fn with_witness(mut self, path: impl Into<PathBuf>) -> Self {
        self.witness = Some(path.into());
        self
    }

    pub fn terminated(&self) -> Vec<u32> {
        self.terminated.lock().unwrap().clone()
    }

    pub fn killed(&self) -> Vec<u32> {
        self.killed.lock().unwrap().clone()
    }

    /// Whether the witness path existed when the process was first seen gone.
    pub fn witness_seen_at_exit(&self) -> Option<bool> {
        *self.witness_seen_at_exit.lock().unwrap()
    }

    fn exit(&self) {
        self.alive.store(false, Ordering::SeqCst);
    }
}

impl ProcessSignaler for RecordingSignaler {
    fn is_alive(&self, _pid: u32) -> bool {
        let alive = self.alive.load(Ordering::SeqCst);
        if !alive && self.behavior != Behavior::Dead {
            let mut seen = self.witness_seen_at_exit.lock().unwrap();
            if seen.is_none() {
                *seen = self.witness.as_ref().map(|path| path.exists());
            }
        }
        alive
    }

    fn terminate(&self, pid: u32) -> io::Result<()> {
        self.terminated.lock().unwrap().push(pid);
        if self.behavior == Behavior::ExitsOnTerm {
            self.exit();
        }
        Ok(())
    }

    fn kill(&self, pid: u32) -> io::Result<()> {
        self.killed.lock().unwrap().push(pid);
        self.exit();
        Ok(())
    }
}

/// HTTP client that never goes through a system proxy.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .build()
        .expect("Failed to build HTTP client")
}
