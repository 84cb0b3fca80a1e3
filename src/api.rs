//! HTTP surface.
//!
//! A compact Axum router with these endpoints:
//!
//! - `POST /search` – Interpret the query with the LLM, search the index with both the raw
//!   query and the interpretation, and return `{ query, semantic_context, results }`.
//! - `POST /sync` – Re-read the worksheet and rebuild the index from scratch.
//! - `GET /metrics` – Observe sync and search counters.
//! - `GET /commands` – Machine-readable command catalog for quick discovery by tools.
//!
//! Upstream failures are not differentiated: every service error maps to a `500` whose body
//! is the error text.

use crate::models::{SearchResponse, SyncOutcome};
use crate::search::{SearchApi, SearchError, SyncError};
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

/// Build the HTTP router exposing the search API surface.
pub fn create_router<S>(service: Arc<S>) -> Router
where
    S: SearchApi + 'static,
{
    Router::new()
        .route("/search", post(search::<S>))
        .route("/sync", post(sync::<S>))
        .route("/metrics", get(get_metrics::<S>))
        .route("/commands", get(get_commands))
        .with_state(service)
}

/// Request body for the `POST /search` endpoint.
#[derive(Deserialize)]
struct SearchRequest {
    /// Free-text query, forwarded verbatim to both the LLM and Elasticsearch.
    query: String,
}

/// Run an interpreted search.
async fn search<S>(
    State(service): State<Arc<S>>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, AppError>
where
    S: SearchApi,
{
    let response = service.search(request.query).await?;
    Ok(Json(response))
}

/// Rebuild the index from the worksheet.
async fn sync<S>(State(service): State<Arc<S>>) -> Result<Json<SyncOutcome>, AppError>
where
    S: SearchApi,
{
    let outcome = service.sync().await?;
    tracing::info!(
        index = %outcome.index,
        rows = outcome.rows_read,
        documents = outcome.documents_indexed,
        "Sync request completed"
    );
    Ok(Json(outcome))
}

/// Return the counter snapshot.
async fn get_metrics<S>(State(service): State<Arc<S>>) -> Json<crate::metrics::MetricsSnapshot>
where
    S: SearchApi,
{
    Json(service.metrics_snapshot())
}

/// Descriptor for a single command in the discovery catalog.
#[derive(Serialize)]
struct CommandDescriptor {
    name: &'static str,
    method: &'static str,
    path: &'static str,
    description: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    request_example: Option<serde_json::Value>,
}

/// Response body for `GET /commands`.
#[derive(Serialize)]
struct CommandsResponse {
    commands: Vec<CommandDescriptor>,
}

/// Enumerate supported HTTP commands for discovery.
async fn get_commands() -> Json<CommandsResponse> {
    Json(CommandsResponse {
        commands: vec![
            CommandDescriptor {
                name: "search",
                method: "POST",
                path: "/search",
                description: "Interpret a query with the LLM and search the article index. Response returns { \"query\", \"semantic_context\", \"results\": [{ \"title\", \"content\", \"score\" }] }.",
                request_example: Some(json!({ "query": "battery efficiency" })),
            },
            CommandDescriptor {
                name: "sync",
                method: "POST",
                path: "/sync",
                description: "Re-read the worksheet, drop and recreate the index, and write one document per row.",
                request_example: None,
            },
            CommandDescriptor {
                name: "metrics",
                method: "GET",
                path: "/metrics",
                description: "Return sync and search counters.",
                request_example: None,
            },
        ],
    })
}

enum AppError {
    Search(SearchError),
    Sync(SyncError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = match self {
            Self::Search(error) => {
                tracing::error!(error = %error, "Search request failed");
                error.to_string()
            }
            Self::Sync(error) => {
                tracing::error!(error = %error, "Sync request failed");
                error.to_string()
            }
        };
        (StatusCode::INTERNAL_SERVER_ERROR, message).into_response()
    }
}

impl From<SearchError> for AppError {
    fn from(inner: SearchError) -> Self {
        Self::Search(inner)
    }
}

impl From<SyncError> for AppError {
    fn from(inner: SyncError) -> Self {
        Self::Sync(inner)
    }
}
