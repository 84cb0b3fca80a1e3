//! Shared types used by the Elasticsearch client.

use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

/// Errors returned while interacting with Elasticsearch.
#[derive(Debug, Error)]
pub enum ElasticError {
    /// Base URL failed to parse or normalize.
    #[error("Invalid Elasticsearch URL: {0}")]
    InvalidUrl(String),
    /// HTTP layer failed before receiving a response.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// Elasticsearch responded with an unexpected status code.
    #[error("Unexpected Elasticsearch response ({status}): {body}")]
    UnexpectedStatus {
        /// HTTP status returned from Elasticsearch.
        status: StatusCode,
        /// Body payload associated with the failing response.
        body: String,
    },
}

/// Credentials attached to every Elasticsearch request.
#[derive(Debug, Clone, Default)]
pub enum ElasticAuth {
    /// No authorization header.
    #[default]
    None,
    /// `Authorization: ApiKey <key>`.
    ApiKey(String),
    /// HTTP basic authentication.
    Basic {
        /// Username.
        username: String,
        /// Optional password.
        password: Option<String>,
    },
}

/// Scored document returned by a search.
#[derive(Debug, Clone)]
pub struct ScoredHit {
    /// Document identifier (the row position for synced articles).
    pub id: String,
    /// Relevance score; absent when Elasticsearch did not score the hit.
    pub score: Option<f64>,
    /// Stored `_source` object, if returned.
    pub source: Option<Map<String, Value>>,
}

#[derive(Deserialize)]
pub(crate) struct SearchResponseBody {
    pub(crate) hits: HitsEnvelope,
}

#[derive(Deserialize)]
pub(crate) struct HitsEnvelope {
    #[serde(default)]
    pub(crate) hits: Vec<RawHit>,
}

#[derive(Deserialize)]
pub(crate) struct RawHit {
    #[serde(rename = "_id", default)]
    pub(crate) id: String,
    #[serde(rename = "_score", default)]
    pub(crate) score: Option<f64>,
    #[serde(rename = "_source", default)]
    pub(crate) source: Option<Map<String, Value>>,
}

#[derive(Deserialize)]
pub(crate) struct CountResponse {
    pub(crate) count: u64,
}
