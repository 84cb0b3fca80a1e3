#![deny(missing_docs)]

//! Core library for the sheetsearch server.

/// HTTP routing and REST handlers.
pub mod api;
/// Environment-driven configuration management.
pub mod config;
/// Elasticsearch integration.
pub mod elastic;
/// LLM-backed semantic query interpretation.
pub mod interpreter;
/// Structured logging and tracing setup.
pub mod logging;
/// Sync and search counters.
pub mod metrics;
/// Shared domain records.
pub mod models;
/// Sync and search orchestration.
pub mod search;
/// Google Sheets integration.
pub mod sheets;
