//! Mapping helpers from Elasticsearch hits to API results.

use crate::{elastic::ScoredHit, models::SearchResult};
use serde_json::Value;

/// Map a scored hit into a search result. Missing source fields become empty strings.
pub(crate) fn map_scored_hit(hit: ScoredHit) -> SearchResult {
    let ScoredHit { score, source, .. } = hit;
    let mut title = String::new();
    let mut content = String::new();

    if let Some(mut map) = source {
        if let Some(Value::String(value)) = map.remove("title") {
            title = value;
        }
        if let Some(Value::String(value)) = map.remove("content") {
            content = value;
        }
    }

    SearchResult {
        title,
        content,
        score: score.unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Map, json};

    #[test]
    fn copies_title_content_and_score() {
        let Value::Object(source) = json!({
            "title": "Rooftop Solar",
            "content": "Panels everywhere.",
            "tags": "solar"
        }) else {
            unreachable!()
        };

        let result = map_scored_hit(ScoredHit {
            id: "0".into(),
            score: Some(2.5),
            source: Some(source),
        });

        assert_eq!(result.title, "Rooftop Solar");
        assert_eq!(result.content, "Panels everywhere.");
        assert_eq!(result.score, 2.5);
    }

    #[test]
    fn tolerates_missing_source_and_score() {
        let result = map_scored_hit(ScoredHit {
            id: "1".into(),
            score: None,
            source: Some(Map::new()),
        });

        assert_eq!(result.title, "");
        assert_eq!(result.content, "");
        assert_eq!(result.score, 0.0);
    }
}
