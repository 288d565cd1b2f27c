use crate::models::book::BookRecord;
use crate::models::query::SearchType;
use std::fmt;

pub const VALIDATION_MESSAGE: &str = "Please enter a search term.";
pub const EMPTY_RESULT_MESSAGE: &str = "No books found. Try a different search term or type.";
pub const TRANSPORT_MESSAGE: &str =
    "Something went wrong. Please check your connection and try again.";

/// Why the last search attempt produced no results. Only the user-facing
/// message is kept here; transport causes go to the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchFailure {
    Validation,
    EmptyResult,
    Transport,
}

impl SearchFailure {
    pub fn message(self) -> &'static str {
        match self {
            SearchFailure::Validation => VALIDATION_MESSAGE,
            SearchFailure::EmptyResult => EMPTY_RESULT_MESSAGE,
            SearchFailure::Transport => TRANSPORT_MESSAGE,
        }
    }
}

impl fmt::Display for SearchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPhase {
    Idle,
    Loading,
}

/// Everything a view needs to draw the search screen.
#[derive(Debug, Clone, Default)]
pub struct SearchState {
    pub query: String,
    pub search_type: SearchType,
    pub results: Vec<BookRecord>,
    pub loading: bool,
    pub error: Option<SearchFailure>,
    pub selected: Option<usize>,
}

impl SearchState {
    pub fn phase(&self) -> SearchPhase {
        if self.loading {
            SearchPhase::Loading
        } else {
            SearchPhase::Idle
        }
    }

    pub fn selected_book(&self) -> Option<&BookRecord> {
        self.selected.and_then(|index| self.results.get(index))
    }
}
