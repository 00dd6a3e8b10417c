//! Configuration module for environment variable parsing.
//!
//! Validation is all-or-nothing: every missing or malformed field is
//! collected so the caller can print one diagnostic per field before
//! exiting.

use std::env;

use thiserror::Error;
use url::Url;

/// Default poll delay in milliseconds (5 minutes).
pub const DEFAULT_DELAY_MS: u64 = 300_000;

/// A single configuration field failure.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is required.")]
    Missing(&'static str),

    #[error("{0} is required or is not a URL.")]
    InvalidUrl(&'static str),

    #[error("{0} is not a valid number of milliseconds.")]
    InvalidNumber(&'static str),
}

/// Poller configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Bearer token for the ledger API
    pub auth_token: String,

    /// Organization whose transactions are polled
    pub organization_id: String,

    /// Shared secret, doubles as the webhook encryption key
    pub secret: String,

    /// Webhook endpoint receiving encrypted donation events
    pub webhook_url: Url,

    /// Poll period in milliseconds
    pub delay_ms: u64,
}

impl Config {
    /// Load and validate the poller configuration from the environment.
    pub fn from_env() -> Result<Self, Vec<ConfigError>> {
        Self::from_lookup(&|name| env::var(name).ok())
    }

    fn from_lookup(lookup: &dyn Fn(&str) -> Option<String>) -> Result<Self, Vec<ConfigError>> {
        let mut errors = Vec::new();

        let auth_token = require_string(lookup, "HCB_AUTH_TOKEN", &mut errors);
        let organization_id = require_string(lookup, "HCB_ORGANIZATION_ID", &mut errors);
        let secret = require_string(lookup, "HCBTHING_SECRET", &mut errors);

        let webhook_url = match lookup("HCBTHING_WEBHOOK") {
            Some(raw) => match Url::parse(&raw) {
                Ok(url) => Some(url),
                Err(_) => {
                    errors.push(ConfigError::InvalidUrl("HCBTHING_WEBHOOK"));
                    None
                }
            },
            None => {
                errors.push(ConfigError::InvalidUrl("HCBTHING_WEBHOOK"));
                None
            }
        };

        let delay_ms = match lookup("HCBBTHING_DELAY") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(ms) => ms,
                Err(_) => {
                    errors.push(ConfigError::InvalidNumber("HCBBTHING_DELAY"));
                    DEFAULT_DELAY_MS
                }
            },
            None => DEFAULT_DELAY_MS,
        };

        match (auth_token, organization_id, secret, webhook_url) {
            (Some(auth_token), Some(organization_id), Some(secret), Some(webhook_url))
                if errors.is_empty() =>
            {
                Ok(Config {
                    auth_token,
                    organization_id,
                    secret,
                    webhook_url,
                    delay_ms,
                })
            }
            _ => Err(errors),
        }
    }
}

/// Receiver configuration: only the shared secret is needed.
#[derive(Debug, Clone)]
pub struct ReceiverConfig {
    /// Shared secret used to decrypt inbound webhook bodies
    pub secret: String,
}

impl ReceiverConfig {
    /// Load and validate the receiver configuration from the environment.
    pub fn from_env() -> Result<Self, Vec<ConfigError>> {
        Self::from_lookup(&|name| env::var(name).ok())
    }

    fn from_lookup(lookup: &dyn Fn(&str) -> Option<String>) -> Result<Self, Vec<ConfigError>> {
        match lookup("HCBTHING_SECRET") {
            Some(secret) => Ok(ReceiverConfig { secret }),
            None => Err(vec![ConfigError::Missing("HCBTHING_SECRET")]),
        }
    }
}

fn require_string(
    lookup: &dyn Fn(&str) -> Option<String>,
    name: &'static str,
    errors: &mut Vec<ConfigError>,
) -> Option<String> {
    match lookup(name) {
        Some(value) => Some(value),
        None => {
            errors.push(ConfigError::Missing(name));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        let map: HashMap<&str, &str> = pairs.iter().copied().collect();
        move |name| map.get(name).map(|v| v.to_string())
    }

    fn valid_pairs() -> Vec<(&'static str, &'static str)> {
        vec![
            ("HCB_AUTH_TOKEN", "token"),
            ("HCB_ORGANIZATION_ID", "org_123"),
            ("HCBTHING_SECRET", "hunter2"),
            ("HCBTHING_WEBHOOK", "https://example.com/webhook"),
        ]
    }

    #[test]
    fn test_all_fields_missing() {
        let errors = Config::from_lookup(&|_| None).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ConfigError::Missing("HCB_AUTH_TOKEN"),
                ConfigError::Missing("HCB_ORGANIZATION_ID"),
                ConfigError::Missing("HCBTHING_SECRET"),
                ConfigError::InvalidUrl("HCBTHING_WEBHOOK"),
            ]
        );
    }

    #[test]
    fn test_single_field_missing_is_named() {
        let pairs: Vec<_> = valid_pairs()
            .into_iter()
            .filter(|(name, _)| *name != "HCB_ORGANIZATION_ID")
            .collect();
        let lookup = lookup_from(&pairs);
        let errors = Config::from_lookup(&lookup).unwrap_err();
        assert_eq!(errors, vec![ConfigError::Missing("HCB_ORGANIZATION_ID")]);
    }

    #[test]
    fn test_valid_config_defaults_delay() {
        let pairs = valid_pairs();
        let lookup = lookup_from(&pairs);
        let config = Config::from_lookup(&lookup).unwrap();
        assert_eq!(config.auth_token, "token");
        assert_eq!(config.organization_id, "org_123");
        assert_eq!(config.webhook_url.as_str(), "https://example.com/webhook");
        assert_eq!(config.delay_ms, 300_000);
    }

    #[test]
    fn test_explicit_delay() {
        let mut pairs = valid_pairs();
        pairs.push(("HCBBTHING_DELAY", "60000"));
        let lookup = lookup_from(&pairs);
        let config = Config::from_lookup(&lookup).unwrap();
        assert_eq!(config.delay_ms, 60_000);
    }

    #[test]
    fn test_non_numeric_delay_rejected() {
        let mut pairs = valid_pairs();
        pairs.push(("HCBBTHING_DELAY", "five minutes"));
        let lookup = lookup_from(&pairs);
        let errors = Config::from_lookup(&lookup).unwrap_err();
        assert_eq!(errors, vec![ConfigError::InvalidNumber("HCBBTHING_DELAY")]);
    }

    #[test]
    fn test_invalid_webhook_url() {
        let mut pairs: Vec<_> = valid_pairs()
            .into_iter()
            .filter(|(name, _)| *name != "HCBTHING_WEBHOOK")
            .collect();
        pairs.push(("HCBTHING_WEBHOOK", "not a url"));
        let lookup = lookup_from(&pairs);
        let errors = Config::from_lookup(&lookup).unwrap_err();
        assert_eq!(errors, vec![ConfigError::InvalidUrl("HCBTHING_WEBHOOK")]);
    }

    #[test]
    fn test_error_messages_name_the_field() {
        assert_eq!(
            ConfigError::Missing("HCB_AUTH_TOKEN").to_string(),
            "HCB_AUTH_TOKEN is required."
        );
        assert_eq!(
            ConfigError::InvalidUrl("HCBTHING_WEBHOOK").to_string(),
            "HCBTHING_WEBHOOK is required or is not a URL."
        );
    }

    #[test]
    fn test_receiver_config() {
        let lookup = lookup_from(&[("HCBTHING_SECRET", "hunter2")]);
        let config = ReceiverConfig::from_lookup(&lookup).unwrap();
        assert_eq!(config.secret, "hunter2");

        let errors = ReceiverConfig::from_lookup(&|_| None).unwrap_err();
        assert_eq!(errors, vec![ConfigError::Missing("HCBTHING_SECRET")]);
    }
}
