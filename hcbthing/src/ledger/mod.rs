//! Ledger API adapter.
//!
//! Thin wrapper around the remote HCB ledger. The poller treats every
//! operation as a black box: listing and detail fetches report failure
//! as `None` (logged here), tag creation is fire-and-forget.

pub mod client;
pub mod types;

pub use client::{LedgerClient, DETAIL_BASE_URL};
pub use types::{DonationDetails, Transaction};
