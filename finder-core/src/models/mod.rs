pub mod book;
pub mod history;
pub mod query;
pub mod state;
pub mod storage;
