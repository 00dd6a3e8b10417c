//! Webhook endpoint handlers.
//!
//! The receiver exposes a single route: `POST /webhook` with a hex
//! ciphertext body. Everything else falls through to a generic 500.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use tracing::{error, info, warn};

use crate::config::ReceiverConfig;
use crate::crypto;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ReceiverConfig>,
}

impl AppState {
    pub fn new(config: ReceiverConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

/// `POST /webhook` - decrypt the body with the shared secret and log
/// the event.
///
/// Decryption failure means the sender does not hold the secret: 401.
/// Successful decryption with a non-JSON plaintext cannot come from the
/// poller (the AES-GCM tag authenticates the body) and yields 500.
pub async fn webhook(State(state): State<AppState>, body: String) -> StatusCode {
    let plaintext = match crypto::decrypt(&state.config.secret, &body) {
        Ok(plaintext) => plaintext,
        Err(e) => {
            warn!(error = %e, "webhook_decrypt_failed");
            return StatusCode::UNAUTHORIZED;
        }
    };

    match serde_json::from_str::<serde_json::Value>(&plaintext) {
        Ok(event) => {
            info!(event = %event, "webhook_event_received");
            StatusCode::OK
        }
        Err(e) => {
            error!(error = %e, "webhook_event_parse_failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Catch-all for every other path and method.
pub async fn fallback() -> StatusCode {
    StatusCode::INTERNAL_SERVER_ERROR
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(secret: &str) -> AppState {
        AppState::new(ReceiverConfig {
            secret: secret.to_string(),
        })
    }

    #[tokio::test]
    async fn test_webhook_accepts_valid_ciphertext() {
        let body = crypto::encrypt("hunter2", r#"{"a":1}"#).unwrap();
        let status = webhook(State(state("hunter2")), body).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_webhook_rejects_garbage_hex() {
        let status = webhook(State(state("hunter2")), "zzzz".to_string()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_webhook_rejects_wrong_secret() {
        let body = crypto::encrypt("hunter2", r#"{"a":1}"#).unwrap();
        let status = webhook(State(state("hunter3")), body).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_webhook_rejects_non_json_plaintext() {
        let body = crypto::encrypt("hunter2", "not json").unwrap();
        let status = webhook(State(state("hunter2")), body).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_fallback_is_500() {
        assert_eq!(fallback().await, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
