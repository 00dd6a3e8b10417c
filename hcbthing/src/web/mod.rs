//! Web server module for receiving encrypted webhooks.

pub mod handlers;

pub use handlers::{fallback, webhook, AppState};
