//! Tally REST API Server
//!
//! This binary starts the Tally REST API server, exposing the fixed sales
//! report catalog as read-only JSON endpoints.

use std::net::SocketAddr;

use anyhow::Context;
use clap::Parser;
use dotenvy::dotenv;
use mongodb::Client;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use tally_db::SalesRepository;
use tally_server::{create_router, AppState, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Parse command line arguments
    let config = ServerConfig::parse();

    // The client connects lazily; a bad URL is the only hard startup failure.
    let client = Client::with_uri_str(&config.mongo_url)
        .await
        .context("Invalid MongoDB connection string")?;
    let store = SalesRepository::new(&client, &config.database);

    // An unreachable store is logged but not fatal: the process stays up and
    // every report request surfaces the store error to its caller.
    match store.ping().await {
        Ok(()) => info!("MongoDB connection established"),
        Err(err) => error!("MongoDB unreachable at startup: {err}"),
    }

    // Build router
    let app = create_router(AppState::new(store), &config);

    // Bind to address
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("Invalid address")?;

    let listener = TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!("Starting Tally API server on http://{}", addr);
    info!(
        "OpenAPI document available at http://{}/api-docs/openapi.json",
        addr
    );

    // Start server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
