//! OAuth access for the Sheets API.
//!
//! Two Google JSON key kinds are understood: service-account keys, exchanged through a signed
//! RS256 JWT assertion, and authorized-user keys, exchanged through their refresh token.

use crate::sheets::types::{SheetsError, TokenResponse};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::path::Path;
use time::OffsetDateTime;

/// Read-only scope requested for every token.
pub const SHEETS_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets.readonly";

const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// Parsed Google credentials file.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GoogleCredentials {
    /// Service-account key (`"type": "service_account"`).
    ServiceAccount(ServiceAccountKey),
    /// End-user OAuth credentials (`"type": "authorized_user"`).
    AuthorizedUser(AuthorizedUserKey),
}

/// Fields of a service-account key used for the JWT-bearer grant.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    /// Service-account identity, used as the assertion issuer.
    pub client_email: String,
    /// PEM-encoded RSA private key.
    pub private_key: String,
    /// Key identifier placed in the JWT `kid` header.
    #[serde(default)]
    pub private_key_id: Option<String>,
    /// OAuth token endpoint; also the assertion audience.
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

/// Fields of an authorized-user key used for the refresh-token grant.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthorizedUserKey {
    /// OAuth client identifier.
    pub client_id: String,
    /// OAuth client secret.
    pub client_secret: String,
    /// Long-lived refresh token.
    pub refresh_token: String,
    /// OAuth token endpoint.
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

impl GoogleCredentials {
    /// Load and parse a credentials file.
    pub async fn from_file(path: &Path) -> Result<Self, SheetsError> {
        let raw = tokio::fs::read_to_string(path).await.map_err(|error| {
            SheetsError::Credentials(format!("failed to read {}: {error}", path.display()))
        })?;
        Self::from_json(&raw)
    }

    /// Parse credentials from their JSON text.
    pub fn from_json(raw: &str) -> Result<Self, SheetsError> {
        serde_json::from_str(raw).map_err(|error| SheetsError::Credentials(error.to_string()))
    }

    /// Exchange the credentials for a bearer token scoped to read-only Sheets access.
    pub async fn access_token(&self, http: &Client) -> Result<String, SheetsError> {
        let (token_uri, response) = match self {
            Self::ServiceAccount(key) => {
                let assertion = key.signed_assertion(OffsetDateTime::now_utc().unix_timestamp())?;
                let response = http
                    .post(&key.token_uri)
                    .form(&[
                        ("grant_type", JWT_BEARER_GRANT),
                        ("assertion", assertion.as_str()),
                    ])
                    .send()
                    .await?;
                (&key.token_uri, response)
            }
            Self::AuthorizedUser(key) => {
                let response = http
                    .post(&key.token_uri)
                    .form(&[
                        ("grant_type", "refresh_token"),
                        ("client_id", key.client_id.as_str()),
                        ("client_secret", key.client_secret.as_str()),
                        ("refresh_token", key.refresh_token.as_str()),
                    ])
                    .send()
                    .await?;
                (&key.token_uri, response)
            }
        };

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let error = SheetsError::TokenExchange { status, body };
            tracing::error!(token_uri = %token_uri, error = %error, "Google token exchange failed");
            return Err(error);
        }

        let TokenResponse { access_token } = response.json().await?;
        tracing::debug!(token_uri = %token_uri, "Obtained Google access token");
        Ok(access_token)
    }
}

impl ServiceAccountKey {
    /// Sign the JWT-bearer assertion issued at `issued_at` (unix seconds).
    pub fn signed_assertion(&self, issued_at: i64) -> Result<String, SheetsError> {
        let mut header = Header::new(Algorithm::RS256);
        header.kid = self.private_key_id.clone();

        let claims = AssertionClaims {
            iss: &self.client_email,
            scope: SHEETS_READONLY_SCOPE,
            aud: &self.token_uri,
            iat: issued_at,
            exp: issued_at + ASSERTION_LIFETIME_SECS,
        };
        let key = EncodingKey::from_rsa_pem(self.private_key.as_bytes())?;
        Ok(jsonwebtoken::encode(&header, &claims, &key)?)
    }
}
