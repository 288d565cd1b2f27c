//! Book catalog search: a controller that queries the Open Library search
//! API, keeps the displayed result state, and remembers recent searches in a
//! pluggable key-value store.

pub mod config;
pub mod models;
pub mod services;
pub mod utils;

pub use config::{BackendConfig, Config, ConfigError};
pub use models::book::BookRecord;
pub use models::history::HistoryEntry;
pub use models::query::{SearchQuery, SearchType};
pub use models::state::{SearchFailure, SearchPhase, SearchState};
pub use models::storage::{SharedStorage, Storage, StorageError};
pub use services::catalog::{Catalog, CatalogError, OpenLibraryCatalog, SharedCatalog};
pub use services::controller::{CompletedSearch, PendingSearch, SearchController, SearchOutcome};
pub use services::history::{HistoryStore, HISTORY_LIMIT};
