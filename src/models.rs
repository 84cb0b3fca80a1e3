//! Domain records shared by the sheet reader, the indexer, and the HTTP surface.

use serde::{Deserialize, Serialize};

/// A single article row read from the worksheet.
///
/// Identity is the row position within the sheet; articles carry no stable key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    /// Value of the `Title` column.
    pub title: String,
    /// Value of the `Content` column; the field searches match against.
    pub content: String,
    /// Value of the `Tags` column, kept as free text.
    pub tags: String,
}

/// One scored hit returned to API consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Article title.
    pub title: String,
    /// Article body.
    pub content: String,
    /// Relevance score on the Elasticsearch scale, not normalized.
    pub score: f64,
}

/// Response body of a search: the echoed query, the LLM interpretation, and the hits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Query text exactly as received.
    pub query: String,
    /// LLM interpretation of the query, verbatim.
    pub semantic_context: String,
    /// Hits in Elasticsearch rank order.
    pub results: Vec<SearchResult>,
}

/// Summary of a sheet-to-index sync.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncOutcome {
    /// Index that was rebuilt.
    pub index: String,
    /// Data rows read from the worksheet.
    pub rows_read: usize,
    /// Documents written to the index.
    pub documents_indexed: usize,
}
