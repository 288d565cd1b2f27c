use crate::models::query::SearchQuery;
use serde::{Deserialize, Serialize};

/// A remembered search. Serialized flat as `{"query", "type", "timestamp"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(flatten)]
    pub query: SearchQuery,
    /// Epoch milliseconds of the most recent successful run.
    pub timestamp: i64,
}

impl HistoryEntry {
    pub fn new(query: SearchQuery, timestamp: i64) -> Self {
        Self { query, timestamp }
    }

    pub fn is_same_search(&self, query: &SearchQuery) -> bool {
        self.query == *query
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::query::SearchType;

    #[test]
    fn test_persisted_shape_is_flat() {
        let query = SearchQuery::new("Dune", SearchType::Title).unwrap();
        let entry = HistoryEntry::new(query, 1_700_000_000_000);
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "query": "Dune",
                "type": "title",
                "timestamp": 1_700_000_000_000i64
            })
        );

        let back: HistoryEntry = serde_json::from_value(json).unwrap();
        assert_eq!(back, entry);
    }
}
