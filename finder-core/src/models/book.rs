use serde::{Deserialize, Serialize};

/// One element of the catalog's `docs` array. Every field is optional and the
/// record is never validated; it is only read for display.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookRecord {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author_name: Option<Vec<String>>,
    #[serde(default)]
    pub first_publish_year: Option<i32>,
    #[serde(default)]
    pub cover_i: Option<i64>,
    #[serde(default)]
    pub publisher: Option<Vec<String>>,
    #[serde(default)]
    pub isbn: Option<Vec<String>>,
    #[serde(default)]
    pub subject: Option<Vec<String>>,
    #[serde(default)]
    pub ratings_average: Option<f64>,
    #[serde(default)]
    pub ratings_count: Option<u64>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub docs: Option<Vec<BookRecord>>,
    #[serde(rename = "numFound", default)]
    pub num_found: Option<u64>,
}

impl SearchResponse {
    pub fn into_records(self) -> Vec<BookRecord> {
        self.docs.unwrap_or_default()
    }
}

impl BookRecord {
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or("Untitled")
    }

    /// First two authors, as shown on a result card.
    pub fn short_authors(&self) -> String {
        match self.author_name.as_deref() {
            Some(authors) if !authors.is_empty() => {
                authors.iter().take(2).cloned().collect::<Vec<_>>().join(", ")
            }
            _ => "Unknown Author".to_string(),
        }
    }

    pub fn all_authors(&self) -> String {
        match self.author_name.as_deref() {
            Some(authors) if !authors.is_empty() => authors.join(", "),
            _ => "Unknown".to_string(),
        }
    }

    pub fn year_label(&self) -> String {
        self.first_publish_year
            .map(|year| year.to_string())
            .unwrap_or_else(|| "Year N/A".to_string())
    }

    pub fn publishers(&self, limit: usize) -> Option<String> {
        non_empty(&self.publisher)
            .map(|list| list.iter().take(limit).cloned().collect::<Vec<_>>().join(", "))
    }

    pub fn first_isbn(&self) -> Option<&str> {
        non_empty(&self.isbn).and_then(|list| list.first()).map(String::as_str)
    }

    pub fn subjects(&self, limit: usize) -> Vec<&str> {
        non_empty(&self.subject)
            .map(|list| list.iter().take(limit).map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Average rating to one decimal, as shown on a result card.
    pub fn rating_short(&self) -> Option<String> {
        self.rating().map(|avg| format!("{:.1}", avg))
    }

    pub fn rating_detail(&self) -> Option<String> {
        self.rating()
            .map(|avg| format!("{:.2} ({} ratings)", avg, self.ratings_count.unwrap_or(0)))
    }

    /// Link to the record's page on the catalog site, if it has a key.
    pub fn work_url(&self, catalog_url: &str) -> Option<String> {
        self.key
            .as_deref()
            .map(|key| format!("{}{}", catalog_url.trim_end_matches('/'), key))
    }

    // A zero average is treated as "no rating".
    fn rating(&self) -> Option<f64> {
        self.ratings_average.filter(|avg| *avg > 0.0)
    }
}

fn non_empty(list: &Option<Vec<String>>) -> Option<&Vec<String>> {
    list.as_ref().filter(|items| !items.is_empty())
}
