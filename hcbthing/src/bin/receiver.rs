//! HCBThing Receiver - encrypted webhook listener.
//!
//! Single-route server: `POST /webhook` decrypts the body with the
//! shared secret and logs the event; every other route answers 500.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use axum::routing::post;
use axum::Router;
use tokio::{net::TcpListener, signal};
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use hcbthing::web::{fallback, webhook, AppState};
use hcbthing::ReceiverConfig;

/// Fixed listen port.
const PORT: u16 = 3000;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize structured JSON logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().flatten_event(true))
        .init();

    info!(version = env!("CARGO_PKG_VERSION"), "receiver_starting");

    let config = match ReceiverConfig::from_env() {
        Ok(config) => config,
        Err(errors) => {
            for err in &errors {
                error!(%err, "config_invalid");
            }
            error!("Exiting...");
            std::process::exit(1);
        }
    };

    let state = AppState::new(config);

    // Wrong-method requests on /webhook fall through to the same
    // generic 500 as unknown paths.
    let app = Router::new()
        .route("/webhook", post(webhook).fallback(fallback))
        .fallback(fallback)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], PORT));
    let listener = TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!(address = %addr, "receiver_listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("receiver_shutdown_complete");

    Ok(())
}

/// Create a future that completes when a shutdown signal is received.
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
        _ = ctrl_c => info!("Received SIGINT"),
        _ = terminate => info!("Received SIGTERM"),
    }

    info!("receiver_shutting_down");
}
