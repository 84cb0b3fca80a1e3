//! Sync and search pipelines: worksheet to index, and query to interpreted hits.

mod mappers;
mod service;
pub mod types;

pub use service::{SearchApi, SearchService, SearchSettings};
pub use types::{InitError, SearchError, SyncError};
