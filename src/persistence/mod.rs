// src/persistence/mod.rs
pub mod json_file;
pub mod memory;
pub mod repository;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

use crate::domain::{Auction, AuctionId};

pub use self::json_file::JsonFileStore;
pub use self::memory::MemoryStore;
pub use self::repository::Repository;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Auction not found in store: {0}")]
    NotFound(AuctionId),

    #[error("I/O failure on {path}: {message}")]
    Io { path: String, message: String },

    #[error("Failed to serialize auction document: {0}")]
    Serialization(String),

    #[error("Store lock poisoned")]
    Poisoned,
}

/// The whole persisted document: every auction keyed by id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuctionSet {
    pub auctions: HashMap<AuctionId, Auction>,
}

/// Document store holding one `AuctionSet`.
///
/// `put` and `delete` change the authoritative state; `flush` makes it
/// durable. A failed `flush` leaves the state in place for the next attempt.
pub trait Database: Send + Sync {
    fn get(&self, id: &str) -> Result<Auction, StoreError>;
    fn get_all(&self) -> Result<HashMap<AuctionId, Auction>, StoreError>;
    fn put(&mut self, id: &str, auction: Auction) -> Result<(), StoreError>;
    fn delete(&mut self, id: &str) -> Result<(), StoreError>;
    fn flush(&mut self) -> Result<(), StoreError>;
}
