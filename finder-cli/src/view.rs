//! Plain-text rendering of the controller state. Nothing here mutates state.

use chrono::Local;
use finder_core::utils::covers::{cover_url, CoverSize};
use finder_core::utils::time::from_millis;
use finder_core::{BookRecord, HistoryEntry, SearchPhase, SearchState, SearchType};
use std::fmt::Write;

const DETAIL_PUBLISHERS: usize = 3;
const DETAIL_SUBJECTS: usize = 8;

/// Base URLs needed to turn records into links.
#[derive(Debug, Clone)]
pub struct Links {
    pub catalog_url: String,
    pub covers_url: String,
}

pub fn render_type_selector(current: SearchType) -> String {
    let options: Vec<String> = SearchType::ALL
        .iter()
        .map(|t| {
            if *t == current {
                format!("[{}]", t)
            } else {
                t.to_string()
            }
        })
        .collect();
    format!("Search by: {}", options.join(" "))
}

/// Loading indicator, error message, or result count, in that priority.
pub fn render_status(state: &SearchState) -> Option<String> {
    if state.phase() == SearchPhase::Loading {
        return Some("Searching for books...".to_string());
    }
    if let Some(error) = state.error {
        return Some(error.message().to_string());
    }
    if !state.results.is_empty() {
        return Some(format!("Found {} books", state.results.len()));
    }
    None
}

pub fn render_results(results: &[BookRecord], links: &Links) -> String {
    let mut out = String::new();
    for (i, book) in results.iter().enumerate() {
        let _ = write!(
            out,
            "{:>3}. {}\n     {} | {}",
            i + 1,
            book.title(),
            book.short_authors(),
            book.year_label()
        );
        if let Some(rating) = book.rating_short() {
            let _ = write!(out, " | ⭐ {}", rating);
        }
        let _ = writeln!(out);
        let cover = cover_url(&links.covers_url, book.cover_i, CoverSize::Medium);
        let _ = writeln!(out, "     {}", cover);
    }
    out
}

pub fn render_detail(book: &BookRecord, links: &Links) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "== {} ==", book.title());
    let cover = cover_url(&links.covers_url, book.cover_i, CoverSize::Large);
    let _ = writeln!(out, "Cover:           {}", cover);
    let _ = writeln!(out, "Author(s):       {}", book.all_authors());
    let _ = writeln!(
        out,
        "First Published: {}",
        book.first_publish_year.map(|y| y.to_string()).unwrap_or_else(|| "N/A".to_string())
    );
    if let Some(publishers) = book.publishers(DETAIL_PUBLISHERS) {
        let _ = writeln!(out, "Publisher(s):    {}", publishers);
    }
    if let Some(isbn) = book.first_isbn() {
        let _ = writeln!(out, "ISBN:            {}", isbn);
    }
    let subjects = book.subjects(DETAIL_SUBJECTS);
    if !subjects.is_empty() {
        let _ = writeln!(out, "Subjects:        {}", subjects.join(" · "));
    }
    if let Some(rating) = book.rating_detail() {
        let _ = writeln!(out, "Rating:          ⭐ {}", rating);
    }
    if let Some(url) = book.work_url(&links.catalog_url) {
        let _ = writeln!(out, "View on Open Library: {}", url);
    }
    let _ = write!(out, "(:close to dismiss)");
    out
}

pub fn render_history(entries: &[HistoryEntry]) -> String {
    if entries.is_empty() {
        return "No recent searches.".to_string();
    }

    let mut out = String::from("Recent searches:");
    for (i, entry) in entries.iter().enumerate() {
        let _ = write!(out, "\n{:>3}. {}", i + 1, entry.query);
        if let Some(at) = from_millis(entry.timestamp) {
            let _ = write!(out, "  ({})", at.with_timezone(&Local).format("%Y-%m-%d %H:%M"));
        }
    }
    out
}

/// Whole screen: selector, history, status, then either the detail view or
/// the result list.
pub fn render_screen(state: &SearchState, history: &[HistoryEntry], links: &Links) -> String {
    let mut sections = vec![render_type_selector(state.search_type)];

    if !history.is_empty() {
        sections.push(render_history(history));
    }
    if let Some(status) = render_status(state) {
        sections.push(status);
    }
    if let Some(book) = state.selected_book() {
        sections.push(render_detail(book, links));
    } else if !state.loading && !state.results.is_empty() {
        sections.push(render_results(&state.results, links).trim_end().to_string());
    }

    sections.join("\n\n")
}
