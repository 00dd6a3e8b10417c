//! HCBThing - donation relay for the HCB ledger.
//!
//! This library provides shared modules for the two HCBThing binaries:
//! - `hcbthing-poller`: Timer-driven poller that tags donation
//!   transactions and relays new donations as encrypted webhook events
//! - `hcbthing-receiver`: Thin web server that decrypts and logs
//!   inbound events
//!
//! ## Architecture
//!
//! ```text
//! Ledger API → Poller → encrypted POST → Receiver
//! ```
//!
//! The processes share no runtime state; the encrypted HTTP payload is
//! the only channel between them.

pub mod config;
pub mod crypto;
pub mod ledger;
pub mod notify;
pub mod poller;
pub mod web;

// Re-export commonly used types
pub use config::{Config, ReceiverConfig};
pub use ledger::{DonationDetails, LedgerClient, Transaction};
pub use notify::DonationEvent;
pub use web::AppState;
