//! HCBThing Poller - donation detection and webhook relay.
//!
//! Polls the HCB ledger for an organization's transactions on a fixed
//! timer, tags donation transactions and relays each new donation to
//! the configured webhook as an encrypted event.

use anyhow::{Context, Result};
use tracing::{error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use hcbthing::{Config, LedgerClient};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize structured JSON logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().flatten_event(true))
        .init();

    info!(version = env!("CARGO_PKG_VERSION"), "poller_starting");

    // Load configuration; one diagnostic per bad field, then exit
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(errors) => {
            for err in &errors {
                error!(%err, "config_invalid");
            }
            error!("Exiting...");
            std::process::exit(1);
        }
    };

    info!(
        organization_id = %config.organization_id,
        webhook_host = config.webhook_url.host_str().unwrap_or(""),
        delay_ms = config.delay_ms,
        "config_loaded"
    );

    let ledger = LedgerClient::new(config.auth_token.clone())?;

    info!("ledger_connecting");
    ledger
        .prepare()
        .await
        .context("Failed to connect to the ledger API")?;
    info!("ledger_connected");

    if !ledger.is_authorized(&config.organization_id).await {
        error!(
            organization_id = %config.organization_id,
            "ledger_authorization_failed"
        );
        std::process::exit(1);
    }
    info!("ledger_authorized");

    hcbthing::poller::run(config, ledger).await?;

    Ok(())
}
