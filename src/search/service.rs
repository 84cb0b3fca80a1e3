//! Search service coordinating the worksheet reader, the indexer, and the interpreter.

use crate::{
    config::Config,
    elastic::{ElasticService, build_search_query},
    interpreter::{SemanticInterpreter, get_interpreter},
    metrics::{MetricsSnapshot, SearchMetrics},
    models::{Article, SearchResponse, SyncOutcome},
    search::{
        mappers::map_scored_hit,
        types::{InitError, SearchError, SyncError},
    },
    sheets::SheetsClient,
};
use async_trait::async_trait;
use std::sync::Arc;

/// Static settings the service needs on every call.
#[derive(Debug, Clone)]
pub struct SearchSettings {
    /// Index rebuilt by every sync and queried by every search.
    pub index: String,
    /// Spreadsheet identifier of the article source.
    pub sheet_id: String,
    /// Worksheet read during sync.
    pub worksheet: String,
    /// Hits requested per search.
    pub result_size: usize,
}

impl SearchSettings {
    /// Extract the settings from the loaded configuration.
    pub fn from_config(config: &Config) -> Self {
        Self {
            index: config.elasticsearch_index.clone(),
            sheet_id: config.google_sheet_id.clone(),
            worksheet: config.google_worksheet.clone(),
            result_size: config.search_result_size,
        }
    }
}

/// Owns long-lived handles to the sheet reader, the Elasticsearch transport, the interpreter,
/// and the counters. Construct once near process start and share it through an `Arc`.
pub struct SearchService {
    sheets: SheetsClient,
    elastic: ElasticService,
    interpreter: Box<dyn SemanticInterpreter>,
    settings: SearchSettings,
    metrics: Arc<SearchMetrics>,
}

/// Abstraction over the service used by the HTTP surface.
#[async_trait]
pub trait SearchApi: Send + Sync {
    /// Rebuild the index from the worksheet.
    async fn sync(&self) -> Result<SyncOutcome, SyncError>;

    /// Interpret and run a search query.
    async fn search(&self, query: String) -> Result<SearchResponse, SearchError>;

    /// Retrieve the current metrics snapshot for diagnostics.
    fn metrics_snapshot(&self) -> MetricsSnapshot;
}

impl SearchService {
    /// Build the service and its clients from configuration.
    pub fn new(config: &Config) -> Result<Self, InitError> {
        tracing::info!(provider = ?config.llm_provider, "Initializing search service");
        Ok(Self::from_parts(
            SheetsClient::new(config)?,
            ElasticService::new(config)?,
            get_interpreter(config),
            SearchSettings::from_config(config),
        ))
    }

    /// Assemble the service from already constructed components.
    pub fn from_parts(
        sheets: SheetsClient,
        elastic: ElasticService,
        interpreter: Box<dyn SemanticInterpreter>,
        settings: SearchSettings,
    ) -> Self {
        Self {
            sheets,
            elastic,
            interpreter,
            settings,
            metrics: Arc::new(SearchMetrics::new()),
        }
    }

    /// Read the worksheet and rebuild the index from it.
    pub async fn sync(&self) -> Result<SyncOutcome, SyncError> {
        let SearchSettings {
            index,
            sheet_id,
            worksheet,
            ..
        } = &self.settings;
        tracing::info!(sheet_id = %sheet_id, worksheet = %worksheet, "Syncing worksheet");

        let articles = self.sheets.fetch_articles(sheet_id, worksheet).await?;
        let documents_indexed = self.reindex(&articles).await?;

        Ok(SyncOutcome {
            index: index.clone(),
            rows_read: articles.len(),
            documents_indexed,
        })
    }

    /// Drop and recreate the index, then write one document per article, id = row position.
    ///
    /// Writes are sequential. The first failed write aborts the run; documents written before
    /// it stay in the index.
    pub async fn reindex(&self, articles: &[Article]) -> Result<usize, SyncError> {
        let index = self.settings.index.as_str();

        self.elastic.delete_index(index).await?;
        self.elastic.create_index(index).await?;

        for (row, article) in articles.iter().enumerate() {
            self.elastic
                .index_document(index, row, article)
                .await
                .map_err(|source| {
                    tracing::error!(index, row, error = %source, "Document write failed");
                    SyncError::Document { row, source }
                })?;
        }

        self.elastic.refresh(index).await?;
        self.metrics.record_sync(articles.len() as u64);
        tracing::info!(index, documents = articles.len(), "Indexed articles");
        Ok(articles.len())
    }

    /// Interpret the query with the LLM, then search the index with both texts.
    pub async fn search(&self, query: String) -> Result<SearchResponse, SearchError> {
        let semantic_context = self.interpreter.interpret(&query).await?;
        let body = build_search_query(&query, &semantic_context, self.settings.result_size);

        let hits = self.elastic.search(&self.settings.index, &body).await?;
        let results: Vec<_> = hits.into_iter().map(map_scored_hit).collect();

        self.metrics.record_search();
        tracing::info!(
            index = %self.settings.index,
            results = results.len(),
            "Search completed"
        );

        Ok(SearchResponse {
            query,
            semantic_context,
            results,
        })
    }

    /// Count the documents currently in the index.
    pub async fn document_count(&self) -> Result<u64, SearchError> {
        Ok(self.elastic.count(&self.settings.index).await?)
    }

    /// Return the current metrics snapshot.
    pub fn metrics_snapshot(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}

#[async_trait]
impl SearchApi for SearchService {
    async fn sync(&self) -> Result<SyncOutcome, SyncError> {
        SearchService::sync(self).await
    }

    async fn search(&self, query: String) -> Result<SearchResponse, SearchError> {
        SearchService::search(self, query).await
    }

    fn metrics_snapshot(&self) -> MetricsSnapshot {
        SearchService::metrics_snapshot(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elastic::ElasticAuth;
    use crate::interpreter::InterpreterError;
    use httpmock::{
        Method::{DELETE, POST, PUT},
        MockServer,
    };
    use regex::Regex;
    use reqwest::Client;
    use serde_json::json;
    use std::path::PathBuf;

    struct FixedInterpreter {
        reply: Result<String, String>,
    }

    impl FixedInterpreter {
        fn replying(reply: &str) -> Self {
            Self {
                reply: Ok(reply.to_string()),
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                reply: Err(message.to_string()),
            }
        }
    }

    #[async_trait]
    impl SemanticInterpreter for FixedInterpreter {
        async fn interpret(&self, _query: &str) -> Result<String, InterpreterError> {
            self.reply
                .clone()
                .map_err(InterpreterError::RequestFailed)
        }
    }

    fn service(server: &MockServer, interpreter: FixedInterpreter) -> SearchService {
        let http = Client::builder()
            .user_agent("sheetsearch-test")
            .build()
            .expect("client");
        SearchService::from_parts(
            SheetsClient {
                http: http.clone(),
                base_url: server.base_url(),
                credentials_path: PathBuf::from("/unused"),
            },
            ElasticService {
                client: http,
                base_url: server.base_url(),
                auth: ElasticAuth::None,
            },
            Box::new(interpreter),
            SearchSettings {
                index: "articles".into(),
                sheet_id: "sheet-1".into(),
                worksheet: "Sheet1".into(),
                result_size: 10,
            },
        )
    }

    fn article(title: &str, content: &str) -> Article {
        Article {
            title: title.into(),
            content: content.into(),
            tags: String::new(),
        }
    }

    #[tokio::test]
    async fn reindex_rebuilds_index_and_writes_each_row() {
        let server = MockServer::start_async().await;
        let delete = server
            .mock_async(|when, then| {
                when.method(DELETE).path("/articles");
                then.status(200).json_body(json!({ "acknowledged": true }));
            })
            .await;
        let create = server
            .mock_async(|when, then| {
                when.method(PUT).path("/articles");
                then.status(200).json_body(json!({ "acknowledged": true }));
            })
            .await;
        let docs = server
            .mock_async(|when, then| {
                when.method(PUT)
                    .path_matches(Regex::new(r"^/articles/_doc/[0-2]$").expect("regex"));
                then.status(201).json_body(json!({ "result": "created" }));
            })
            .await;
        let refresh = server
            .mock_async(|when, then| {
                when.method(POST).path("/articles/_refresh");
                then.status(200).json_body(json!({}));
            })
            .await;

        let service = service(&server, FixedInterpreter::replying(""));
        let written = service
            .reindex(&[
                article("Solar", "Panels."),
                article("Wind", "Turbines."),
                article("Hydro", "Dams."),
            ])
            .await
            .expect("index articles");

        delete.assert_async().await;
        create.assert_async().await;
        refresh.assert_async().await;
        docs.assert_hits_async(3).await;
        assert_eq!(written, 3);

        let snapshot = service.metrics_snapshot();
        assert_eq!(snapshot.syncs_completed, 1);
        assert_eq!(snapshot.documents_indexed, 3);
    }

    #[tokio::test]
    async fn reindex_stops_at_first_failed_write() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(DELETE).path("/articles");
                then.status(404);
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(PUT).path("/articles");
                then.status(200).json_body(json!({ "acknowledged": true }));
            })
            .await;
        let first = server
            .mock_async(|when, then| {
                when.method(PUT).path("/articles/_doc/0");
                then.status(201).json_body(json!({ "result": "created" }));
            })
            .await;
        let failing = server
            .mock_async(|when, then| {
                when.method(PUT).path("/articles/_doc/1");
                then.status(500).body("shard failure");
            })
            .await;
        let never = server
            .mock_async(|when, then| {
                when.method(PUT).path("/articles/_doc/2");
                then.status(201);
            })
            .await;

        let service = service(&server, FixedInterpreter::replying(""));
        let error = service
            .reindex(&[
                article("a", "a"),
                article("b", "b"),
                article("c", "c"),
            ])
            .await
            .expect_err("second write fails");

        first.assert_hits_async(1).await;
        failing.assert_hits_async(1).await;
        never.assert_hits_async(0).await;
        assert!(matches!(error, SyncError::Document { row: 1, .. }));
        assert_eq!(service.metrics_snapshot().syncs_completed, 0);
    }

    #[tokio::test]
    async fn search_combines_interpretation_and_hits() {
        let server = MockServer::start_async().await;
        let expected_body = build_search_query(
            "battery efficiency",
            "energy storage and charge retention",
            10,
        );
        let search = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/articles/_search")
                    .json_body(expected_body.clone());
                then.status(200).json_body(json!({
                    "hits": {
                        "hits": [
                            {
                                "_id": "0",
                                "_score": 2.1,
                                "_source": {
                                    "title": "Enhancing Battery Storage for Renewable Energy",
                                    "content": "Improving battery efficiency for the grid.",
                                    "tags": "battery"
                                }
                            }
                        ]
                    }
                }));
            })
            .await;

        let service = service(
            &server,
            FixedInterpreter::replying("energy storage and charge retention"),
        );
        let response = service
            .search("battery efficiency".into())
            .await
            .expect("search");

        search.assert_async().await;
        assert_eq!(response.query, "battery efficiency");
        assert_eq!(response.semantic_context, "energy storage and charge retention");
        assert_eq!(response.results.len(), 1);
        assert_eq!(
            response.results[0].title,
            "Enhancing Battery Storage for Renewable Energy"
        );
        assert!(response.results[0].score > 0.0);
        assert_eq!(service.metrics_snapshot().searches_served, 1);
    }

    #[tokio::test]
    async fn interpreter_failure_skips_elasticsearch() {
        let server = MockServer::start_async().await;
        let search = server
            .mock_async(|when, then| {
                when.method(POST).path("/articles/_search");
                then.status(200).json_body(json!({ "hits": { "hits": [] } }));
            })
            .await;

        let service = service(&server, FixedInterpreter::failing("quota exceeded"));
        let error = service
            .search("solar".into())
            .await
            .expect_err("interpreter failure");

        search.assert_hits_async(0).await;
        assert!(matches!(error, SearchError::Interpreter(_)));
        assert_eq!(service.metrics_snapshot().searches_served, 0);
    }
}
