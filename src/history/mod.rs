//! Bounded, deduplicating clipboard history.

pub mod store;

pub use store::{HistoryError, HistoryStore, MAX_HISTORY};
