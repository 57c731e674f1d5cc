//! Signal-based process control.
//!
//! Liveness probing and termination of another instance by pid, plus the
//! shutdown future the server waits on.

use std::io;

use devlog_core::ProcessSignaler;
use tracing::{info, warn};

/// [`ProcessSignaler`] backed by POSIX signals.
///
/// - `is_alive`: `kill(pid, 0)`
/// - `terminate`: `kill(pid, SIGTERM)`
/// - `kill`: `kill(pid, SIGKILL)`
///
/// On non-Unix targets every pid reads as not alive and termination is
/// unsupported.
#[derive(Debug, Clone, Copy, Default)]
pub struct NixSignaler;

impl ProcessSignaler for NixSignaler {
    fn is_alive(&self, pid: u32) -> bool {
        pid_exists(pid)
    }

    fn terminate(&self, pid: u32) -> io::Result<()> {
        send_signal(pid, ProcessSignal::Terminate)
    }

    fn kill(&self, pid: u32) -> io::Result<()> {
        send_signal(pid, ProcessSignal::Kill)
    }
}

#[derive(Debug, Clone, Copy)]
enum ProcessSignal {
    Terminate,
    Kill,
}

/// Check if a PID exists (without verifying what it runs).
///
/// Uses `kill` with null signal which doesn't send a signal but checks existence.
#[cfg(unix)]
pub fn pid_exists(pid: u32) -> bool {
    use nix::sys::signal;
    use nix::unistd::Pid;

    // pid 0 would address our own process group.
    let Ok(raw) = i32::try_from(pid) else {
        return false;
    };
    if raw == 0 {
        return false;
    }

    // Signal None is a special "null signal" that checks if we can signal the process
    match signal::kill(Pid::from_raw(raw), None) {
        Ok(()) => true,
        Err(nix::errno::Errno::ESRCH) => false, // No such process
        Err(_) => true,                         // Process exists but we lack permission
    }
}

#[cfg(not(unix))]
pub fn pid_exists(_pid: u32) -> bool {
    false // Not implemented on non-Unix
}

#[cfg(unix)]
fn send_signal(pid: u32, which: ProcessSignal) -> io::Result<()> {
    use nix::sys::signal::{self, Signal};
    use nix::unistd::Pid;

    let raw = i32::try_from(pid)
        .ok()
        .filter(|raw| *raw > 0)
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("pid {pid} cannot be signaled"),
            )
        })?;

    let sig = match which {
        ProcessSignal::Terminate => Signal::SIGTERM,
        ProcessSignal::Kill => Signal::SIGKILL,
    };
    signal::kill(Pid::from_raw(raw), sig).map_err(io::Error::from)
}

#[cfg(not(unix))]
fn send_signal(_pid: u32, _which: ProcessSignal) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "signal-based termination not implemented on this platform",
    ))
}

/// Resolve once SIGINT (Ctrl+C) or SIGTERM arrives.
///
/// If a handler cannot be installed, that branch never resolves and the
/// failure is logged.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received SIGINT, starting graceful shutdown"),
        () = terminate => info!("Received SIGTERM, starting graceful shutdown"),
    }
}
