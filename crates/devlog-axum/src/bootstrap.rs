//! Server bootstrap - the composition root.
//!
//! The only place where the file store, the router and the runtime helpers
//! are wired together. [`launch`] walks the startup sequence and hands back
//! a [`RunningServer`] once the instance has answered its own health check.

use std::fmt;
use std::io;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use devlog_core::{
    DEFAULT_MAX_BODY_BYTES, DEFAULT_SELF_CHECK_TIMEOUT, DEFAULT_SHUTDOWN_TIMEOUT,
    DEFAULT_TAKEOVER_GRACE, DevLogPaths, EntryStore, PathError, ProcessSignaler, StoreError,
    ensure_directory,
};
use devlog_runtime::record::{write_pid, write_port};
use devlog_runtime::{SelfCheckError, TakeoverOutcome, probe_host, reap_stale_instance, self_check};
use devlog_store::FileEntryStore;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::routes::create_router;
use crate::state::AppContext;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Directory holding `dev-logs.json`, `pid.txt` and `port.txt`.
    pub data_dir: PathBuf,
    /// Interface to bind. The port is always chosen by the OS.
    pub host: IpAddr,
    /// Ingestion body ceiling in bytes.
    pub max_body_bytes: usize,
    /// Bound on the post-bind health probe.
    pub self_check_timeout: Duration,
    /// How long a signaled prior instance gets to exit, per signal.
    pub takeover_grace: Duration,
    /// How long shutdown may spend draining in-flight requests.
    pub shutdown_timeout: Duration,
}

impl ServerConfig {
    /// Loopback-only config rooted at `data_dir`.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            self_check_timeout: DEFAULT_SELF_CHECK_TIMEOUT,
            takeover_grace: DEFAULT_TAKEOVER_GRACE,
            shutdown_timeout: DEFAULT_SHUTDOWN_TIMEOUT,
        }
    }

    #[must_use]
    pub const fn with_host(mut self, host: IpAddr) -> Self {
        self.host = host;
        self
    }

    #[must_use]
    pub const fn with_max_body_bytes(mut self, max_body_bytes: usize) -> Self {
        self.max_body_bytes = max_body_bytes;
        self
    }

    #[must_use]
    pub const fn with_self_check_timeout(mut self, timeout: Duration) -> Self {
        self.self_check_timeout = timeout;
        self
    }

    #[must_use]
    pub const fn with_takeover_grace(mut self, grace: Duration) -> Self {
        self.takeover_grace = grace;
        self
    }

    #[must_use]
    pub const fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }
}

/// Startup phases, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecyclePhase {
    NoPriorInstance,
    StaleInstanceSignaled,
    Bound,
    SelfVerified,
    SelfCheckFailed,
}

impl fmt::Display for LifecyclePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NoPriorInstance => "no-prior-instance",
            Self::StaleInstanceSignaled => "stale-instance-signaled",
            Self::Bound => "bound",
            Self::SelfVerified => "self-verified",
            Self::SelfCheckFailed => "self-check-failed",
        };
        f.write_str(name)
    }
}

/// Why [`launch`] gave up.
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("Data directory unusable: {0}")]
    DataDir(#[from] PathError),

    #[error("Failed to clear previous log document: {0}")]
    Store(#[from] StoreError),

    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    #[error("Self-test failed: {0}")]
    SelfCheck(#[from] SelfCheckError),
}

/// A server that is bound, serving and verified.
///
/// Dropping it does not stop the server task; call [`RunningServer::shutdown`]
/// or cancel the token from [`RunningServer::shutdown_token`].
pub struct RunningServer {
    addr: SocketAddr,
    pid: u32,
    paths: DevLogPaths,
    takeover: TakeoverOutcome,
    cancel: CancellationToken,
    handle: JoinHandle<io::Result<()>>,
}

impl RunningServer {
    /// The OS-assigned port.
    pub const fn port(&self) -> u16 {
        self.addr.port()
    }

    pub const fn pid(&self) -> u32 {
        self.pid
    }

    /// `http://host:port`, with a wildcard bind reported as loopback.
    pub fn base_url(&self) -> String {
        let addr = SocketAddr::new(probe_host(self.addr.ip()), self.addr.port());
        format!("http://{addr}")
    }

    pub const fn paths(&self) -> &DevLogPaths {
        &self.paths
    }

    /// What the takeover step found at startup.
    pub const fn takeover(&self) -> TakeoverOutcome {
        self.takeover
    }

    /// Token that stops the server when cancelled.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Stop accepting connections, drain in-flight requests, and join the task.
    pub async fn shutdown(self) -> io::Result<()> {
        self.cancel.cancel();
        self.wait().await
    }

    /// Like [`RunningServer::shutdown`], but gives up on the drain after `limit`.
    ///
    /// On timeout the accept loop is aborted and `TimedOut` is returned; the
    /// caller is expected to exit the process, which ends any connection
    /// still open.
    pub async fn shutdown_within(self, limit: Duration) -> io::Result<()> {
        self.cancel.cancel();
        self.wait_within(limit).await
    }

    /// Wait for the server task to finish, at most `limit` after it was asked to stop.
    ///
    /// The limit only starts counting once the shutdown token is cancelled.
    pub async fn wait_within(mut self, limit: Duration) -> io::Result<()> {
        tokio::select! {
            result = &mut self.handle => return join_result(result),
            () = self.cancel.cancelled() => {}
        }

        match tokio::time::timeout(limit, &mut self.handle).await {
            Ok(result) => join_result(result),
            Err(_) => {
                warn!(limit_ms = limit.as_millis(), "Drain timed out, abandoning open connections");
                self.handle.abort();
                Err(io::Error::new(
                    io::ErrorKind::TimedOut,
                    format!("in-flight requests still open after {}ms", limit.as_millis()),
                ))
            }
        }
    }

    /// Wait for the server task to finish.
    pub async fn wait(self) -> io::Result<()> {
        join_result(self.handle.await)
    }
}

fn join_result(result: Result<io::Result<()>, tokio::task::JoinError>) -> io::Result<()> {
    result.unwrap_or_else(|e| Err(io::Error::other(e)))
}

/// Start a dev-log instance.
///
/// # Sequence
/// 1. Ensure the data directory exists and is writable
/// 2. Stop a prior instance recorded in `pid.txt`, waiting for it to exit
///    (never fatal)
/// 3. Remove the previous log document
/// 4. Bind `host:0`
/// 5. Record pid and port (failures are logged and tolerated)
/// 6. Serve in a background task
/// 7. Probe `/health`; a failed probe stops the server again
pub async fn launch(
    config: ServerConfig,
    signaler: &dyn ProcessSignaler,
) -> Result<RunningServer, LaunchError> {
    launch_with_router(config, signaler, create_router).await
}

/// [`launch`] with a caller-supplied router factory.
///
/// The factory receives the context wired to the file store.
pub async fn launch_with_router<F>(
    config: ServerConfig,
    signaler: &dyn ProcessSignaler,
    build_router: F,
) -> Result<RunningServer, LaunchError>
where
    F: FnOnce(AppContext) -> Router,
{
    ensure_directory(&config.data_dir)?;
    let paths = DevLogPaths::new(&config.data_dir);

    let takeover = reap_stale_instance(&paths, signaler, config.takeover_grace).await;
    let phase = if takeover.signaled() {
        LifecyclePhase::StaleInstanceSignaled
    } else {
        LifecyclePhase::NoPriorInstance
    };
    info!(%phase, ?takeover, "Prior instance handled");

    let store = Arc::new(FileEntryStore::new(paths.log_file()));
    store.clear().await?;

    let bind_addr = SocketAddr::new(config.host, 0);
    let listener = TcpListener::bind(bind_addr)
        .await
        .map_err(|source| LaunchError::Bind {
            addr: bind_addr,
            source,
        })?;
    let addr = listener
        .local_addr()
        .map_err(|source| LaunchError::Bind {
            addr: bind_addr,
            source,
        })?;
    let pid = std::process::id();
    info!(phase = %LifecyclePhase::Bound, %addr, pid, "Listening");

    persist_records(&paths, pid, addr.port());

    let ctx = AppContext::new(store).with_max_body_bytes(config.max_body_bytes);
    let app = build_router(ctx);
    let cancel = CancellationToken::new();
    let handle = tokio::spawn({
        let cancel = cancel.clone();
        async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(cancel.cancelled_owned())
                .await
        }
    });

    let server = RunningServer {
        addr,
        pid,
        paths,
        takeover,
        cancel,
        handle,
    };

    if let Err(e) = self_check(config.host, addr.port(), config.self_check_timeout).await {
        error!(phase = %LifecyclePhase::SelfCheckFailed, error = %e, "Self-test failed");
        if let Err(join) = server.shutdown_within(config.shutdown_timeout).await {
            warn!(error = %join, "Server task ended with an error");
        }
        return Err(LaunchError::SelfCheck(e));
    }

    info!(phase = %LifecyclePhase::SelfVerified, port = addr.port(), "Server ready");
    Ok(server)
}

fn persist_records(paths: &DevLogPaths, pid: u32, port: u16) {
    if let Err(e) = write_pid(paths, pid) {
        warn!(path = %paths.pid_file().display(), error = %e, "Failed to write pid record");
    }
    if let Err(e) = write_port(paths, port) {
        warn!(path = %paths.port_file().display(), error = %e, "Failed to write port record");
    }
}
