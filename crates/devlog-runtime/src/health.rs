//! Post-bind self-check.
//!
//! After binding, the server calls its own `/health` endpoint once. A
//! server that cannot answer itself must not stay up half-initialized.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;

use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::{debug, info};

/// Why the self-check failed.
#[derive(Debug, Error)]
pub enum SelfCheckError {
    /// `/health` answered, but not with 200.
    #[error("status {0}")]
    Status(u16),

    /// No answer within the bounded timeout.
    #[error("timeout after {}ms", .0.as_millis())]
    Timeout(Duration),

    /// Connection or protocol failure.
    #[error("{0}")]
    Request(String),
}

/// Address to probe for a server bound on `host`.
///
/// A wildcard bind (`0.0.0.0` / `::`) is probed over loopback of the same family.
pub fn probe_host(host: IpAddr) -> IpAddr {
    match host {
        IpAddr::V4(v4) if v4.is_unspecified() => IpAddr::V4(Ipv4Addr::LOCALHOST),
        IpAddr::V6(v6) if v6.is_unspecified() => IpAddr::V6(Ipv6Addr::LOCALHOST),
        other => other,
    }
}

/// Issue one `GET /health` against the server on `host:port`.
///
/// Succeeds only on a 200 answer within `timeout`.
pub async fn self_check(host: IpAddr, port: u16, timeout: Duration) -> Result<(), SelfCheckError> {
    let addr = SocketAddr::new(probe_host(host), port);
    let health_url = format!("http://{addr}/health");
    debug!(url = %health_url, "Running self-check");

    let client = Client::builder()
        .timeout(timeout)
        .no_proxy()
        .build()
        .map_err(|e| SelfCheckError::Request(e.to_string()))?;

    match client.get(&health_url).send().await {
        Ok(response) if response.status() == StatusCode::OK => {
            info!(port, "Self-test passed: server is healthy");
            Ok(())
        }
        Ok(response) => Err(SelfCheckError::Status(response.status().as_u16())),
        Err(e) if e.is_timeout() => Err(SelfCheckError::Timeout(timeout)),
        Err(e) => Err(SelfCheckError::Request(e.to_string())),
    }
}
