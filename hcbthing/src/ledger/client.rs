//! HTTP client for the ledger API.

use anyhow::{bail, Context, Result};
use reqwest::Client;
use tracing::{info, warn};

use super::types::{DonationDetails, Transaction};

/// Base for per-transaction donation detail URLs.
pub const DETAIL_BASE_URL: &str = "https://hcb.hackclub.com/hcb/";

const API_BASE_URL: &str = "https://hcb.hackclub.com/api/v3";

/// Ledger API client carrying the bearer auth token.
///
/// Cheap to clone; the underlying connection pool is shared.
#[derive(Clone)]
pub struct LedgerClient {
    http: Client,
    auth_token: String,
}

impl LedgerClient {
    pub fn new(auth_token: String) -> Result<Self> {
        let http = Client::builder()
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { http, auth_token })
    }

    /// Derive the donation detail URL for a transaction.
    pub fn detail_url(transaction_id: &str) -> String {
        format!("{}{}", DETAIL_BASE_URL, transaction_id)
    }

    /// Prime the API session and verify the auth token is accepted.
    pub async fn prepare(&self) -> Result<()> {
        let response = self
            .http
            .get(format!("{}/user", API_BASE_URL))
            .bearer_auth(&self.auth_token)
            .send()
            .await
            .context("Failed to reach the ledger API")?;

        if !response.status().is_success() {
            bail!(
                "Ledger API rejected the auth token (status {})",
                response.status()
            );
        }

        Ok(())
    }

    /// Check whether the token is authorized for an organization.
    pub async fn is_authorized(&self, organization_id: &str) -> bool {
        let response = self
            .http
            .get(format!("{}/organizations/{}", API_BASE_URL, organization_id))
            .bearer_auth(&self.auth_token)
            .send()
            .await;

        match response {
            Ok(resp) => resp.status().is_success(),
            Err(e) => {
                warn!(
                    organization_id = organization_id,
                    error = %e,
                    "ledger_authorization_check_error"
                );
                false
            }
        }
    }

    /// List all transactions for an organization.
    ///
    /// Returns `None` on any transport or decode failure; the caller
    /// treats absence as "log and skip" for the cycle.
    pub async fn list_transactions(&self, organization_id: &str) -> Option<Vec<Transaction>> {
        let response = self
            .http
            .get(format!(
                "{}/organizations/{}/transactions",
                API_BASE_URL, organization_id
            ))
            .bearer_auth(&self.auth_token)
            .send()
            .await;

        let response = match response {
            Ok(resp) if resp.status().is_success() => resp,
            Ok(resp) => {
                warn!(
                    organization_id = organization_id,
                    status_code = resp.status().as_u16(),
                    "ledger_transactions_fetch_failed"
                );
                return None;
            }
            Err(e) => {
                warn!(
                    organization_id = organization_id,
                    error = %e,
                    "ledger_transactions_fetch_error"
                );
                return None;
            }
        };

        match response.json::<Vec<Transaction>>().await {
            Ok(transactions) => Some(transactions),
            Err(e) => {
                warn!(
                    organization_id = organization_id,
                    error = %e,
                    "ledger_transactions_decode_failed"
                );
                None
            }
        }
    }

    /// Fetch donation details from an absolute detail URL.
    ///
    /// Returns `None` on failure; the transaction stays untagged and is
    /// retried next cycle.
    pub async fn fetch_donation_details(&self, url: &str) -> Option<DonationDetails> {
        let response = self
            .http
            .get(url)
            .bearer_auth(&self.auth_token)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await;

        let response = match response {
            Ok(resp) if resp.status().is_success() => resp,
            Ok(resp) => {
                warn!(
                    url = url,
                    status_code = resp.status().as_u16(),
                    "donation_details_fetch_failed"
                );
                return None;
            }
            Err(e) => {
                warn!(url = url, error = %e, "donation_details_fetch_error");
                return None;
            }
        };

        match response.json::<DonationDetails>().await {
            Ok(details) => Some(details),
            Err(e) => {
                warn!(url = url, error = %e, "donation_details_decode_failed");
                None
            }
        }
    }

    /// Attach a tag to a transaction. Fire-and-forget: failures are
    /// logged and swallowed.
    pub async fn create_tag(
        &self,
        organization_id: &str,
        transaction_id: &str,
        label: &str,
        color: &str,
    ) {
        let response = self
            .http
            .post(format!(
                "{}/organizations/{}/transactions/{}/tags",
                API_BASE_URL, organization_id, transaction_id
            ))
            .bearer_auth(&self.auth_token)
            .json(&serde_json::json!({ "label": label, "color": color }))
            .send()
            .await;

        match response {
            Ok(resp) if resp.status().is_success() => {
                info!(
                    transaction_id = transaction_id,
                    label = label,
                    "ledger_tag_created"
                );
            }
            Ok(resp) => {
                warn!(
                    transaction_id = transaction_id,
                    label = label,
                    status_code = resp.status().as_u16(),
                    "ledger_tag_create_failed"
                );
            }
            Err(e) => {
                warn!(
                    transaction_id = transaction_id,
                    label = label,
                    error = %e,
                    "ledger_tag_create_error"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_url() {
        assert_eq!(
            LedgerClient::detail_url("txn_abc123"),
            "https://hcb.hackclub.com/hcb/txn_abc123"
        );
    }
}
