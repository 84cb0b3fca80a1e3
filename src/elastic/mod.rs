//! Elasticsearch integration.

pub mod client;
pub mod query;
pub mod types;

pub use client::ElasticService;
pub use query::{article_index_mapping, build_search_query};
pub use types::{ElasticAuth, ElasticError, ScoredHit};
