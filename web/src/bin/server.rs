//! Ticketline server.
//!
//! Main server process:
//! - Initializes tracing and the Prometheus metrics exporter
//! - Connects to `PostgreSQL` and runs migrations
//! - Serves the HTTP API until interrupted, then shuts down gracefully
//!
//! # Usage
//!
//! ```bash
//! # Start PostgreSQL, then:
//! cargo run --bin server
//! ```

use std::net::SocketAddr;

use ticketline_web::{build_router, AppState, Config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,ticketline=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Ticketline server...");

    // Load configuration
    let config = Config::from_env();
    tracing::info!(
        database = %config.database.url,
        host = %config.server.host,
        port = config.server.port,
        "Configuration loaded"
    );

    // Metrics exporter for Prometheus scraping
    let metrics_addr: SocketAddr =
        format!("{}:{}", config.server.metrics_host, config.server.metrics_port).parse()?;
    metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(metrics_addr)
        .install()?;
    tracing::info!(addr = %metrics_addr, "Metrics exporter listening");

    // Database
    let pool =
        ticketline_postgres::connect(&config.database.url, config.database.max_connections).await?;
    ticketline_postgres::run_migrations(&pool).await?;
    tracing::info!("Database connected and migrated");

    // HTTP server
    let state = AppState::new(pool, &config);
    let app = build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "Ticketline is running");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shut down gracefully");
    Ok(())
}

/// Resolves when the process receives Ctrl+C.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    } else {
        tracing::info!("Shutdown signal received");
    }
}
