//! Bookkeeping Service - Main Application Entry Point
//!
//! # Startup Flow
//!
//! 1. Load configuration from environment variables
//! 2. Connect storage (PostgreSQL with migrations, or in memory)
//! 3. Set up the invitation mailer
//! 4. Build HTTP router with routes and middleware
//! 5. Start server on configured port

use rust_bookkeeping_web_server::{AppState, build_router, config::Config};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging with tracing subscriber. Reads RUST_LOG environment variable (defaults to "info" level)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    // Load configuration
    let config = Config::from_env()?;
    let environment = config.environment();
    tracing::info!(environment = ?environment, "Configuration loaded");

    let state = AppState::from_config(&config).await?;
    let app = build_router(state, environment);

    // Bind to network address and start server
    let addr = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
