//! Poll loop - fetch, classify and relay donation transactions.
//!
//! One cycle runs immediately at startup, then on a fixed-period timer.
//! Ticks spawn cycles and cycles spawn per-transaction handlers without
//! awaiting either, so a slow cycle can overlap the next one; the remote
//! `Processed` tag is the only reprocessing guard.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use tokio::signal;
use tracing::{error, info};

use crate::config::Config;
use crate::ledger::{LedgerClient, Transaction};
use crate::notify;

/// Memo prefix that classifies a transaction as a donation.
pub const DONATION_PREFIX: &str = "Donation from ";

/// Memo prefix that selects a transaction for webhook processing.
///
/// Strictly looser than [`DONATION_PREFIX`] (no trailing space), so
/// every transaction the classification rule matches is also processed.
pub const PROCESS_PREFIX: &str = "Donation from";

pub const DONATION_TAG: &str = "Donation";
pub const PROCESSED_TAG: &str = "Processed";

/// Actions a cycle takes for one transaction.
#[derive(Debug, PartialEq, Eq)]
pub struct TransactionPlan {
    /// Attach the `Donation` tag
    pub tag_as_donation: bool,
    /// Fetch details, deliver the webhook, attach the `Processed` tag
    pub process: bool,
}

/// Decide what to do with a transaction from its memo and tags.
pub fn plan(memo: &str, tags: &[String]) -> TransactionPlan {
    let has_tag = |label: &str| tags.iter().any(|tag| tag == label);

    TransactionPlan {
        tag_as_donation: memo.starts_with(DONATION_PREFIX) && !has_tag(DONATION_TAG),
        process: memo.starts_with(PROCESS_PREFIX) && !has_tag(PROCESSED_TAG),
    }
}

/// Run the poll loop until SIGINT/SIGTERM.
///
/// Each tick spawns a cycle without awaiting it; there is no overlap
/// guard, so a cycle that outlives the delay runs concurrently with
/// the next one.
pub async fn run(config: Config, ledger: LedgerClient) -> Result<()> {
    let config = Arc::new(config);

    let webhook_client = Client::builder()
        .build()
        .context("Failed to create webhook HTTP client")?;

    let mut ticker = tokio::time::interval(Duration::from_millis(config.delay_ms));

    let shutdown = async {
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
    };

    tokio::pin!(shutdown);

    info!(delay_ms = config.delay_ms, "poller_ready");

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!("poller_stopping");
                break;
            }
            _ = ticker.tick() => {
                let config = Arc::clone(&config);
                let ledger = ledger.clone();
                let webhook_client = webhook_client.clone();

                tokio::spawn(async move {
                    poll_cycle(&config, &ledger, &webhook_client).await;
                });
            }
        }
    }

    info!("poller_shutdown_complete");
    Ok(())
}

/// One fetch-classify-notify cycle.
async fn poll_cycle(config: &Arc<Config>, ledger: &LedgerClient, webhook_client: &Client) {
    let Some(transactions) = ledger.list_transactions(&config.organization_id).await else {
        error!("transactions_fetch_failed");
        return;
    };

    info!(transaction_count = transactions.len(), "poll_cycle_start");

    // Handlers are spawned, not awaited: the cycle returns before any of
    // them finish and sibling transactions have no completion order.
    for transaction in transactions {
        let config = Arc::clone(config);
        let ledger = ledger.clone();
        let webhook_client = webhook_client.clone();

        tokio::spawn(async move {
            handle_transaction(&config, &ledger, &webhook_client, transaction).await;
        });
    }
}

async fn handle_transaction(
    config: &Arc<Config>,
    ledger: &LedgerClient,
    webhook_client: &Client,
    transaction: Transaction,
) {
    let Some(transaction_id) = transaction.transaction_id.clone() else {
        return;
    };

    let plan = plan(&transaction.memo, &transaction.tags);

    if plan.tag_as_donation {
        info!(transaction_id = %transaction_id, "donation_tag_adding");
        ledger
            .create_tag(&config.organization_id, &transaction_id, DONATION_TAG, "red")
            .await;
    }

    if plan.process {
        let url = LedgerClient::detail_url(&transaction_id);
        let Some(details) = ledger.fetch_donation_details(&url).await else {
            error!(transaction_id = %transaction_id, "donation_details_unavailable");
            return;
        };

        // Fire-and-forget delivery: the Processed tag is written whether
        // or not the webhook call succeeds.
        {
            let config = Arc::clone(config);
            let webhook_client = webhook_client.clone();
            let transaction_id = transaction_id.clone();

            tokio::spawn(async move {
                if let Err(e) =
                    notify::send_donation_event(&webhook_client, &config, details).await
                {
                    error!(transaction_id = %transaction_id, error = %e, "webhook_delivery_failed");
                }
            });
        }

        ledger
            .create_tag(
                &config.organization_id,
                &transaction_id,
                PROCESSED_TAG,
                "muted",
            )
            .await;

        info!(transaction_id = %transaction_id, "transaction_processed");
    }
}
