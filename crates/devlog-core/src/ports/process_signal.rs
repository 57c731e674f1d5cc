//! Process signaling port used for single-instance takeover.

use std::io;

/// Liveness probe and termination request over an opaque process id.
///
/// The Unix implementation maps these onto `kill(pid, 0)`, `SIGTERM` and
/// `SIGKILL`.
/// Platforms without signals can back it with any mechanism that can tell
/// whether a recorded owner is still around and ask it to stop.
pub trait ProcessSignaler: Send + Sync {
    /// Whether a process with this id currently exists.
    fn is_alive(&self, pid: u32) -> bool;

    /// Ask the process to terminate gracefully.
    fn terminate(&self, pid: u32) -> io::Result<()>;

    /// Stop the process without giving it a chance to clean up.
    fn kill(&self, pid: u32) -> io::Result<()>;
}
