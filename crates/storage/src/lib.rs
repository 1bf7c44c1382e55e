#![forbid(unsafe_code)]

pub mod history;
pub mod repository;
pub mod sqlite;

pub use history::HISTORY_KEY;
pub use repository::{InMemoryRepository, KeyValueStore, Storage, StorageError};
