//! Coverage HTTP Server Binary
//!
//! Entry point for the rider coverage REST API.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin coverage-server
//!
//! # With an explicit config file
//! COVERAGE_CONFIG=/etc/coverage.toml cargo run --bin coverage-server
//! ```
//!
//! # Environment Variables
//!
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 8080)
//! - `MAX_UPLOAD_BYTES`: Request body limit (default: 52428800)
//! - `DEFAULT_INTERVAL_MINUTES`: Step when a request omits one (default: 30)
//! - `COVERAGE_CONFIG`: Path to a TOML config file
//! - `RUST_LOG`: Log level (default: info)

use std::env;
use std::net::SocketAddr;

use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use rider_coverage::config::ServerConfig;
use rider_coverage::http::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting coverage HTTP server");

    let config = ServerConfig::load()?;
    info!(
        "Config: max_upload_bytes={}, default_interval_minutes={}",
        config.server.max_upload_bytes, config.coverage.default_interval_minutes
    );

    let addr: SocketAddr = config.bind_address().parse()?;
    let app = create_router(AppState::new(config));

    info!("Server listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
