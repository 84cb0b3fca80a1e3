//! Query and mapping bodies sent to Elasticsearch.

use serde_json::{Value, json};

/// Field the raw query and the semantic context are matched against.
pub const CONTENT_FIELD: &str = "content";

/// Compose the boolean search body.
///
/// The raw query is a required `match` on the content field. The LLM interpretation is an
/// optional `should` clause that only contributes to scoring; it is omitted when blank.
pub fn build_search_query(query: &str, semantic_context: &str, size: usize) -> Value {
    let mut bool_query = json!({
        "must": [
            { "match": { CONTENT_FIELD: query } }
        ]
    });

    if !semantic_context.trim().is_empty()
        && let Some(clauses) = bool_query.as_object_mut()
    {
        clauses.insert(
            "should".into(),
            json!([{ "match": { CONTENT_FIELD: semantic_context } }]),
        );
    }

    json!({
        "size": size,
        "query": { "bool": bool_query }
    })
}

/// Index body declaring the article fields as full-text.
pub fn article_index_mapping() -> Value {
    json!({
        "mappings": {
            "properties": {
                "title": { "type": "text" },
                "content": { "type": "text" },
                "tags": { "type": "text" }
            }
        }
    })
}
