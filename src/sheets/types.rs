//! Error and wire types for the Google Sheets reader.

use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Errors raised while authorizing against Google or reading the worksheet.
#[derive(Debug, Error)]
pub enum SheetsError {
    /// Credentials file could not be read or parsed.
    #[error("Invalid Google credentials: {0}")]
    Credentials(String),
    /// Service-account assertion could not be signed.
    #[error("Failed to sign service-account assertion: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
    /// Sheets API base URL failed to parse.
    #[error("Invalid Sheets API URL: {0}")]
    InvalidUrl(String),
    /// HTTP layer failed before receiving a response.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// OAuth token endpoint rejected the credentials.
    #[error("Token exchange failed ({status}): {body}")]
    TokenExchange {
        /// HTTP status returned by the token endpoint.
        status: StatusCode,
        /// Body payload associated with the failing response.
        body: String,
    },
    /// Sheets API responded with an unexpected status code.
    #[error("Unexpected Sheets response ({status}): {body}")]
    UnexpectedStatus {
        /// HTTP status returned by the Sheets API.
        status: StatusCode,
        /// Body payload associated with the failing response.
        body: String,
    },
    /// Header row lacks one of the required columns.
    #[error("Worksheet is missing required column '{0}'")]
    MissingColumn(String),
}

/// `spreadsheets.values.get` response body.
#[derive(Debug, Deserialize)]
pub(crate) struct ValueRange {
    #[serde(default)]
    pub(crate) values: Vec<Vec<Value>>,
}

/// OAuth token endpoint response.
#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub(crate) access_token: String,
}
