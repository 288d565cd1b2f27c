use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchType {
    #[default]
    Title,
    Author,
    Subject,
}

impl SearchType {
    pub const ALL: [SearchType; 3] = [SearchType::Title, SearchType::Author, SearchType::Subject];

    /// Query-string key understood by the catalog's search endpoint.
    pub fn param_key(self) -> &'static str {
        match self {
            SearchType::Title => "title",
            SearchType::Author => "author",
            SearchType::Subject => "subject",
        }
    }
}

impl fmt::Display for SearchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.param_key())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown search type '{0}' (expected title, author or subject)")]
pub struct UnknownSearchType(pub String);

impl FromStr for SearchType {
    type Err = UnknownSearchType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "title" => Ok(SearchType::Title),
            "author" => Ok(SearchType::Author),
            "subject" => Ok(SearchType::Subject),
            _ => Err(UnknownSearchType(s.to_string())),
        }
    }
}

/// A validated search: the text as the user typed it plus the field to match.
///
/// Two queries are the same search when both the text (case-sensitive, untrimmed)
/// and the type match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SearchQuery {
    #[serde(rename = "query")]
    text: String,
    #[serde(rename = "type", default)]
    search_type: SearchType,
}

impl SearchQuery {
    /// Returns `None` when the text is blank after trimming.
    pub fn new(text: impl Into<String>, search_type: SearchType) -> Option<Self> {
        let text = text.into();
        if text.trim().is_empty() {
            return None;
        }
        Some(Self { text, search_type })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn search_type(&self) -> SearchType {
        self.search_type
    }
}

impl fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.text, self.search_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_text_is_rejected() {
        assert!(SearchQuery::new("", SearchType::Title).is_none());
        assert!(SearchQuery::new("   \t\n", SearchType::Author).is_none());
    }

    #[test]
    fn test_text_is_kept_as_typed() {
        let query = SearchQuery::new("  Dune ", SearchType::Title).unwrap();
        assert_eq!(query.text(), "  Dune ");
        assert_eq!(query.search_type(), SearchType::Title);
    }

    #[test]
    fn test_identity_is_case_sensitive() {
        let a = SearchQuery::new("Dune", SearchType::Title).unwrap();
        let b = SearchQuery::new("dune", SearchType::Title).unwrap();
        let c = SearchQuery::new("Dune", SearchType::Subject).unwrap();
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_eq!(a, SearchQuery::new("Dune", SearchType::Title).unwrap());
    }

    #[test]
    fn test_search_type_parsing() {
        assert_eq!("Author".parse::<SearchType>().unwrap(), SearchType::Author);
        assert_eq!(" subject ".parse::<SearchType>().unwrap(), SearchType::Subject);
        assert!("isbn".parse::<SearchType>().is_err());
    }

    #[test]
    fn test_param_keys_are_distinct() {
        let keys: Vec<_> = SearchType::ALL.iter().map(|t| t.param_key()).collect();
        assert_eq!(keys, vec!["title", "author", "subject"]);
    }

    #[test]
    fn test_serialized_shape() {
        let query = SearchQuery::new("Tolkien", SearchType::Author).unwrap();
        let json = serde_json::to_value(&query).unwrap();
        assert_eq!(json, serde_json::json!({ "query": "Tolkien", "type": "author" }));
    }
}
