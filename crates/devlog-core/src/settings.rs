//! Default limits and timeouts shared by every adapter.

use std::time::Duration;

/// Name reported by the status endpoint.
pub const SERVICE_NAME: &str = "dev-log";

/// Largest request body the ingestion endpoint accepts (10 MiB).
pub const DEFAULT_MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// How long the post-bind self-check waits for `/health`.
pub const DEFAULT_SELF_CHECK_TIMEOUT: Duration = Duration::from_secs(2);

/// How long a signaled prior instance gets to exit before it is killed,
/// and how long a kill gets to take effect.
pub const DEFAULT_TAKEOVER_GRACE: Duration = Duration::from_secs(2);

/// How long a shutting-down server may spend draining in-flight requests.
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(2);
