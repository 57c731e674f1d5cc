//! Single-instance takeover at startup.
//!
//! A previous instance leaves its pid in `pid.txt`. Before binding, the new
//! instance probes that pid, stops it if it is still alive, and removes the
//! record either way. Stopping means waiting until the process is gone, so
//! the old instance can no longer write into the log the new one clears.

use std::time::Duration;

use devlog_core::{DevLogPaths, ProcessSignaler};
use tokio::time::{Instant, sleep};
use tracing::{debug, info, warn};

use crate::record::{delete_pid, read_pid};

/// Interval between liveness probes while waiting for an exit.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// What the takeover found and did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TakeoverOutcome {
    /// No pid record existed.
    NoRecord,
    /// A record existed but held no usable pid (unreadable, non-numeric or zero).
    Unparseable,
    /// The recorded process was not running.
    NotRunning { pid: u32 },
    /// The recorded process exited after `SIGTERM`.
    Signaled { pid: u32 },
    /// The recorded process ignored `SIGTERM` and exited after `SIGKILL`.
    Killed { pid: u32 },
    /// The recorded process was still alive after `SIGKILL`.
    Lingering { pid: u32 },
    /// A signal could not be delivered.
    SignalFailed { pid: u32 },
    /// The record names the current process, which is never signaled.
    OwnProcess { pid: u32 },
}

impl TakeoverOutcome {
    /// Whether a termination request reached a live prior instance.
    pub const fn signaled(&self) -> bool {
        matches!(
            self,
            Self::Signaled { .. } | Self::Killed { .. } | Self::Lingering { .. }
        )
    }
}

/// Stop the instance named by an existing pid record, then delete the record.
///
/// # Strategy
/// 1. Read `pid.txt`; a missing record means there is nothing to do
/// 2. For a usable, live pid send `SIGTERM` and poll for exit up to `grace`
/// 3. Still alive: send `SIGKILL` and poll again up to `grace`
/// 4. Delete `pid.txt` whenever it existed, regardless of steps 2 and 3
///
/// Nothing here is fatal. Signal and delete failures are logged and
/// swallowed: the goal is only that no stale record survives startup.
pub async fn reap_stale_instance(
    paths: &DevLogPaths,
    signaler: &dyn ProcessSignaler,
    grace: Duration,
) -> TakeoverOutcome {
    let outcome = match read_pid(paths) {
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %paths.pid_file().display(), "No prior instance recorded");
            return TakeoverOutcome::NoRecord;
        }
        Err(e) => {
            info!(error = %e, "Ignoring unusable pid record");
            TakeoverOutcome::Unparseable
        }
        Ok(0) => {
            info!("Ignoring pid record with pid 0");
            TakeoverOutcome::Unparseable
        }
        Ok(pid) if pid == std::process::id() => {
            debug!(pid, "Pid record names the current process, not signaling");
            TakeoverOutcome::OwnProcess { pid }
        }
        Ok(pid) => stop_instance(pid, signaler, grace).await,
    };

    if let Err(e) = delete_pid(paths) {
        warn!(
            path = %paths.pid_file().display(),
            error = %e,
            "Failed to remove stale pid record"
        );
    }

    outcome
}

async fn stop_instance(
    pid: u32,
    signaler: &dyn ProcessSignaler,
    grace: Duration,
) -> TakeoverOutcome {
    if !signaler.is_alive(pid) {
        info!(pid, "Old process not running, skipping kill");
        return TakeoverOutcome::NotRunning { pid };
    }

    info!(pid, "Killing old process");
    if let Err(e) = signaler.terminate(pid) {
        warn!(pid, error = %e, "Failed to signal old process");
        return TakeoverOutcome::SignalFailed { pid };
    }
    if wait_for_exit(pid, signaler, grace).await {
        debug!(pid, "Old process exited");
        return TakeoverOutcome::Signaled { pid };
    }

    warn!(pid, grace_ms = grace.as_millis(), "Old process ignored SIGTERM, sending SIGKILL");
    if let Err(e) = signaler.kill(pid) {
        warn!(pid, error = %e, "Failed to kill old process");
        return TakeoverOutcome::SignalFailed { pid };
    }
    if wait_for_exit(pid, signaler, grace).await {
        return TakeoverOutcome::Killed { pid };
    }

    warn!(pid, "Old process still present after SIGKILL");
    TakeoverOutcome::Lingering { pid }
}

/// Poll `is_alive` until the process is gone or `limit` elapses.
async fn wait_for_exit(pid: u32, signaler: &dyn ProcessSignaler, limit: Duration) -> bool {
    let deadline = Instant::now() + limit;
    loop {
        if !signaler.is_alive(pid) {
            return true;
        }
        let now = Instant::now();
        if now >= deadline {
            return false;
        }
        sleep(POLL_INTERVAL.min(deadline - now)).await;
    }
}
