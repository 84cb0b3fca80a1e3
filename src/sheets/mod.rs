//! Google Sheets integration: credentials, token exchange, and worksheet reads.

pub mod auth;
pub mod client;
pub mod types;

pub use auth::{AuthorizedUserKey, GoogleCredentials, ServiceAccountKey};
pub use client::SheetsClient;
pub use types::SheetsError;
