//! Wire types for the ledger API.

use serde::{Deserialize, Serialize};

/// A ledger transaction as returned by the listing endpoint.
///
/// Not owned locally: re-fetched in full every poll cycle and mutated
/// only indirectly through tag creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    /// Transaction identifier; listings can contain pending entries
    /// without one
    #[serde(default)]
    pub transaction_id: Option<String>,

    /// Memo text, used for donation classification
    #[serde(default)]
    pub memo: String,

    /// Names of tags currently attached to the transaction
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Transaction {
    pub fn has_tag(&self, label: &str) -> bool {
        self.tags.iter().any(|tag| tag == label)
    }
}

/// Donation details fetched from a per-transaction detail URL.
///
/// The record is forwarded to the webhook as-is; unknown fields are
/// preserved through `extra`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DonationDetails {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub donor: Option<String>,

    #[serde(default)]
    pub amount_cents: Option<i64>,

    #[serde(default)]
    pub date: Option<String>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_defaults() {
        let tx: Transaction = serde_json::from_str("{}").unwrap();
        assert_eq!(tx.transaction_id, None);
        assert_eq!(tx.memo, "");
        assert!(tx.tags.is_empty());
    }

    #[test]
    fn test_transaction_has_tag() {
        let tx: Transaction = serde_json::from_str(
            r#"{"transaction_id":"txn_1","memo":"Donation from Alice","tags":["Donation"]}"#,
        )
        .unwrap();
        assert!(tx.has_tag("Donation"));
        assert!(!tx.has_tag("Processed"));
    }

    #[test]
    fn test_donation_details_preserves_unknown_fields() {
        let details: DonationDetails = serde_json::from_str(
            r#"{"id":"don_1","donor":"Alice","amount_cents":500,"recurring":true}"#,
        )
        .unwrap();
        assert_eq!(details.donor.as_deref(), Some("Alice"));
        assert_eq!(details.amount_cents, Some(500));
        assert_eq!(
            details.extra.get("recurring"),
            Some(&serde_json::Value::Bool(true))
        );

        let json = serde_json::to_string(&details).unwrap();
        assert!(json.contains("\"recurring\":true"));
    }
}
