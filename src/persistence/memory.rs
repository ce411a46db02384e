use std::collections::HashMap;

use crate::domain::{Auction, AuctionId};
use super::{AuctionSet, Database, StoreError};

/// Non-durable store; `flush` has nothing to do.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    document: AuctionSet,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    pub fn with_auctions(auctions: impl IntoIterator<Item = Auction>) -> Self {
        let auctions = auctions.into_iter().map(|a| (a.id.clone(), a)).collect();
        MemoryStore {
            document: AuctionSet { auctions },
        }
    }
}

impl Database for MemoryStore {
    fn get(&self, id: &str) -> Result<Auction, StoreError> {
        self.document
            .auctions
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn get_all(&self) -> Result<HashMap<AuctionId, Auction>, StoreError> {
        Ok(self.document.auctions.clone())
    }

    fn put(&mut self, id: &str, auction: Auction) -> Result<(), StoreError> {
        self.document.auctions.insert(id.to_string(), auction);
        Ok(())
    }

    fn delete(&mut self, id: &str) -> Result<(), StoreError> {
        self.document
            .auctions
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn flush(&mut self) -> Result<(), StoreError> {
        Ok(())
    }
}
