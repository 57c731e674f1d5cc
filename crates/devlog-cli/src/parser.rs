//! Command-line arguments.
//!
//! Every flag can also come from the environment (or a `.env` file).

use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use devlog_axum::ServerConfig;
use devlog_core::DEFAULT_MAX_BODY_BYTES;

/// Local log collector for browser and tool debugging.
///
/// Starts on an OS-assigned port, replaces any instance previously started
/// from the same directory, and keeps received entries in `dev-logs.json`.
#[derive(Debug, Parser)]
#[command(name = "dev-log")]
#[command(version)]
pub struct Cli {
    /// Directory holding dev-logs.json, pid.txt and port.txt
    #[arg(long = "dir", env = "DEVLOG_DIR", default_value = ".")]
    pub dir: PathBuf,

    /// Interface to bind (the port is always chosen by the OS)
    #[arg(long, env = "DEVLOG_HOST", default_value = "127.0.0.1")]
    pub host: IpAddr,

    /// Largest accepted request body, in bytes
    #[arg(long, env = "DEVLOG_MAX_BODY_BYTES", default_value_t = DEFAULT_MAX_BODY_BYTES)]
    pub max_body_bytes: usize,

    /// Timeout for the startup self-check, in milliseconds
    #[arg(long, env = "DEVLOG_SELF_CHECK_TIMEOUT_MS", default_value_t = 2000)]
    pub self_check_timeout_ms: u64,

    /// How long a replaced instance gets to exit after each signal, in milliseconds
    #[arg(long, env = "DEVLOG_TAKEOVER_GRACE_MS", default_value_t = 2000)]
    pub takeover_grace_ms: u64,

    /// How long shutdown waits for in-flight requests, in milliseconds
    #[arg(long, env = "DEVLOG_SHUTDOWN_TIMEOUT_MS", default_value_t = 2000)]
    pub shutdown_timeout_ms: u64,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

impl Cli {
    pub fn server_config(&self) -> ServerConfig {
        ServerConfig::new(&self.dir)
            .with_host(self.host)
            .with_max_body_bytes(self.max_body_bytes)
            .with_self_check_timeout(Duration::from_millis(self.self_check_timeout_ms))
            .with_takeover_grace(Duration::from_millis(self.takeover_grace_ms))
            .with_shutdown_timeout(Duration::from_millis(self.shutdown_timeout_ms))
    }
}
