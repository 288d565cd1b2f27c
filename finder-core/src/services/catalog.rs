use crate::models::book::{BookRecord, SearchResponse};
use crate::models::query::SearchQuery;
use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("invalid catalog URL: {0}")]
    Url(String),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("catalog responded with status {0}")]
    Status(StatusCode),
    #[error("could not decode catalog response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// The remote book catalog.
#[async_trait]
pub trait Catalog {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<BookRecord>, CatalogError>;
}

pub type SharedCatalog = Arc<dyn Catalog + Send + Sync>;

/// `{base}/search.json?{title|author|subject}={text}`, with the text URL-encoded.
pub fn build_search_url(base_url: &str, query: &SearchQuery) -> Result<Url, CatalogError> {
    let endpoint = format!("{}/search.json", base_url.trim_end_matches('/'));
    Url::parse_with_params(&endpoint, &[(query.search_type().param_key(), query.text())])
        .map_err(|e| CatalogError::Url(format!("{}: {}", endpoint, e)))
}

pub fn parse_search_body(body: &str) -> Result<Vec<BookRecord>, CatalogError> {
    let response: SearchResponse = serde_json::from_str(body)?;
    Ok(response.into_records())
}

pub struct OpenLibraryCatalog {
    client: Client,
    base_url: String,
}

impl OpenLibraryCatalog {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl Catalog for OpenLibraryCatalog {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<BookRecord>, CatalogError> {
        let url = build_search_url(&self.base_url, query)?;
        info!("Requesting {}", url);

        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(CatalogError::Status(response.status()));
        }

        let body = response.text().await?;
        parse_search_body(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::query::SearchType;

    #[test]
    fn test_search_url_per_type() {
        let base = "https://openlibrary.org";
        let cases = [
            (SearchType::Title, "https://openlibrary.org/search.json?title=Dune"),
            (SearchType::Author, "https://openlibrary.org/search.json?author=Dune"),
            (SearchType::Subject, "https://openlibrary.org/search.json?subject=Dune"),
        ];

        for (search_type, expected) in cases {
            let query = SearchQuery::new("Dune", search_type).unwrap();
            assert_eq!(build_search_url(base, &query).unwrap().as_str(), expected);
        }
    }

    #[test]
    fn test_search_url_encodes_text() {
        let query = SearchQuery::new("The Lord & the Rings?", SearchType::Title).unwrap();
        let url = build_search_url("https://openlibrary.org/", &query).unwrap();

        assert_eq!(url.path(), "/search.json");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(pairs, vec![("title".to_string(), "The Lord & the Rings?".to_string())]);
        assert!(!url.query().unwrap().contains('&'));
    }

    #[test]
    fn test_invalid_base_url() {
        let query = SearchQuery::new("Dune", SearchType::Title).unwrap();
        assert!(matches!(build_search_url("not a url", &query), Err(CatalogError::Url(_))));
    }

    #[test]
    fn test_parse_search_body() {
        let body = r#"{
            "numFound": 2,
            "start": 0,
            "docs": [{"title": "Dune"}, {"title": "Dune Messiah"}]
        }"#;
        let records = parse_search_body(body).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].title(), "Dune Messiah");

        assert!(parse_search_body(r#"{"numFound": 0, "docs": []}"#).unwrap().is_empty());
        assert!(matches!(parse_search_body("<html>"), Err(CatalogError::Decode(_))));
    }
}
