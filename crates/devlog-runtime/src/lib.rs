//! Process lifecycle and OS-level concerns for dev-log.
//!
//! - [`record`]: the pid/port files a running instance leaves behind
//! - [`signal`]: liveness probing and termination of other processes
//! - [`takeover`]: reaping a stale instance named by an old record
//! - [`health`]: the HTTP self-check run right after bind

#![deny(unsafe_code)]

mod health;
pub mod record;
pub mod signal;
pub mod takeover;

pub use health::{SelfCheckError, probe_host, self_check};
pub use signal::{NixSignaler, pid_exists, shutdown_signal};
pub use takeover::{TakeoverOutcome, reap_stale_instance};
