//! CLI entry point - the composition root.
//!
//! Exit codes: 0 after a shutdown signal, 1 when the server could not start.
//! After a signal, in-flight requests get a bounded drain; whatever is still
//! open when it runs out ends with the process.

use clap::Parser;
use devlog_axum::launch;
use devlog_cli::Cli;
use devlog_runtime::{NixSignaler, shutdown_signal};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables before clap reads its `env` fallbacks
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = cli.server_config();
    let drain_limit = config.shutdown_timeout;

    let server = match launch(config, &NixSignaler).await {
        Ok(server) => server,
        Err(e) => {
            eprintln!("Failed to start dev-log server: {e}");
            std::process::exit(1);
        }
    };

    println!("Dev-log server running on port {}", server.port());
    println!("PID: {}", server.pid());
    println!("Log file: {}", server.paths().log_file().display());

    let token = server.shutdown_token();
    tokio::spawn(async move {
        shutdown_signal().await;
        token.cancel();
    });

    if let Err(e) = server.wait_within(drain_limit).await {
        warn!(error = %e, "Server did not stop cleanly");
    }
    info!("Server stopped");
    Ok(())
}

/// `RUST_LOG` wins; otherwise `info`, or `debug` with `--verbose`.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
