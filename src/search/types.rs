//! Error definitions for the sync and search pipelines.

use crate::{elastic::ElasticError, interpreter::InterpreterError, sheets::SheetsError};
use thiserror::Error;

/// Errors raised while constructing the service clients.
#[derive(Debug, Error)]
pub enum InitError {
    /// Sheets HTTP client could not be built.
    #[error("Failed to initialize Sheets client: {0}")]
    Sheets(#[from] SheetsError),
    /// Elasticsearch client could not be built.
    #[error("Failed to initialize Elasticsearch client: {0}")]
    Elastic(#[from] ElasticError),
}

/// Errors emitted while rebuilding the index from the worksheet.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Worksheet could not be read.
    #[error("Failed to read worksheet: {0}")]
    Sheets(#[from] SheetsError),
    /// Index could not be dropped or recreated.
    #[error("Failed to rebuild index: {0}")]
    Elastic(#[from] ElasticError),
    /// A document write failed; earlier writes are kept.
    #[error("Failed to index row {row}: {source}")]
    Document {
        /// Row position of the failing article.
        row: usize,
        /// Underlying Elasticsearch error.
        #[source]
        source: ElasticError,
    },
}

/// Errors emitted while answering a search.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Semantic interpretation failed.
    #[error("Failed to interpret query: {0}")]
    Interpreter(#[from] InterpreterError),
    /// Elasticsearch search request failed.
    #[error("Elasticsearch request failed: {0}")]
    Elastic(#[from] ElasticError),
}
