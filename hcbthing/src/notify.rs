//! Outbound webhook delivery.
//!
//! Wraps donation details in the event envelope, encrypts the JSON with
//! the shared secret and POSTs the hex ciphertext to the configured
//! webhook. Delivery failures are logged by the caller's spawned task
//! and never gate tagging.

use anyhow::{Context, Result};
use reqwest::{header, Client};
use serde::Serialize;
use tracing::info;

use crate::config::Config;
use crate::crypto;
use crate::ledger::DonationDetails;

/// User-Agent header sent with every webhook delivery.
pub const USER_AGENT: &str = concat!("HCBThing/", env!("CARGO_PKG_VERSION"));

/// Event envelope wrapping donation details before encryption.
#[derive(Debug, Serialize)]
pub struct DonationEvent {
    pub event: &'static str,
    pub data: DonationDetails,
}

impl DonationEvent {
    pub fn new(data: DonationDetails) -> Self {
        Self {
            event: "new-donation",
            data,
        }
    }
}

/// Encrypt and deliver a donation event to the configured webhook.
///
/// The response status is logged but nothing acts on it.
pub async fn send_donation_event(
    client: &Client,
    config: &Config,
    details: DonationDetails,
) -> Result<()> {
    let event = DonationEvent::new(details);
    let body = serde_json::to_string(&event).context("Failed to serialize donation event")?;
    let ciphertext =
        crypto::encrypt(&config.secret, &body).context("Failed to encrypt donation event")?;

    let response = client
        .post(config.webhook_url.clone())
        .header(header::CONTENT_TYPE, "text/plain")
        .header(header::USER_AGENT, USER_AGENT)
        .body(ciphertext)
        .send()
        .await
        .context("Failed to deliver webhook")?;

    info!(
        status_code = response.status().as_u16(),
        "webhook_delivered"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_serialization() {
        let details: DonationDetails = serde_json::from_str(
            r#"{"id":"don_1","donor":"Alice","amount_cents":500}"#,
        )
        .unwrap();

        let event = DonationEvent::new(details);
        let json = serde_json::to_string(&event).unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["event"], "new-donation");
        assert_eq!(parsed["data"]["donor"], "Alice");
        assert_eq!(parsed["data"]["amount_cents"], 500);
    }

    #[test]
    fn test_user_agent_carries_version() {
        assert!(USER_AGENT.starts_with("HCBThing/"));
        assert_ne!(USER_AGENT, "HCBThing/");
    }

    #[test]
    fn test_envelope_encrypts_and_decrypts() {
        let details: DonationDetails = serde_json::from_str(r#"{"id":"don_1"}"#).unwrap();
        let body = serde_json::to_string(&DonationEvent::new(details)).unwrap();

        let ciphertext = crypto::encrypt("hunter2", &body).unwrap();
        let plaintext = crypto::decrypt("hunter2", &ciphertext).unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&plaintext).unwrap();
        assert_eq!(parsed["event"], "new-donation");
    }
}
