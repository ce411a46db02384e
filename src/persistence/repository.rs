use chrono::{DateTime, Utc};
use log::warn;
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::domain::{Auction, AuctionId, AuctionSnapshot, Errors};
use super::{Database, StoreError};

/// Lock-guarded access to the auction document.
///
/// A single reader/writer lock covers the whole document. Reads share it;
/// every mutation holds it exclusively across read, modify, write and flush,
/// so two updates of the same auction can never interleave.
pub struct Repository {
    store: RwLock<Box<dyn Database>>,
}

impl Repository {
    pub fn new<D: Database + 'static>(store: D) -> Self {
        Repository {
            store: RwLock::new(Box::new(store)),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Box<dyn Database>>, Errors> {
        self.store.read().map_err(|_| Errors::from(StoreError::Poisoned))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Box<dyn Database>>, Errors> {
        self.store.write().map_err(|_| Errors::from(StoreError::Poisoned))
    }

    /// The mutation already happened; a failed flush only costs durability.
    fn flush_logged(store: &mut dyn Database, operation: &str, id: &str) {
        if let Err(err) = store.flush() {
            warn!("Failed to persist data after {} of auction {}: {}", operation, id, err);
        }
    }

    pub fn get_auction(&self, id: &str) -> Result<Auction, Errors> {
        Ok(self.read()?.get(id)?)
    }

    pub fn get_all(&self) -> Result<HashMap<AuctionId, Auction>, Errors> {
        Ok(self.read()?.get_all()?)
    }

    /// All auctions, newest first.
    pub fn list_auctions(&self) -> Result<Vec<Auction>, Errors> {
        let mut auctions: Vec<Auction> = self.get_all()?.into_values().collect();
        auctions.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(auctions)
    }

    pub fn create_auction(&self, auction: Auction) -> Result<Auction, Errors> {
        let mut store = self.write()?;
        match store.get(&auction.id) {
            Ok(_) => return Err(Errors::AuctionAlreadyExists(auction.id)),
            Err(StoreError::NotFound(_)) => {}
            Err(err) => return Err(err.into()),
        }

        store.put(&auction.id, auction.clone())?;
        Self::flush_logged(&mut **store, "creation", &auction.id);
        Ok(auction)
    }

    /// Full-record replace.
    pub fn update_auction(&self, id: &str, auction: Auction) -> Result<(), Errors> {
        let mut store = self.write()?;
        store.get(id)?;
        store.put(id, auction)?;
        Self::flush_logged(&mut **store, "update", id);
        Ok(())
    }

    pub fn delete_auction(&self, id: &str) -> Result<(), Errors> {
        let mut store = self.write()?;
        store.delete(id)?;
        Self::flush_logged(&mut **store, "deletion", id);
        Ok(())
    }

    /// Read-modify-write in one exclusive critical section.
    ///
    /// `f` works on a fresh copy; the copy replaces the stored record only when
    /// `f` succeeds, so a rejected operation leaves the auction untouched.
    pub fn modify<T, F>(&self, id: &str, f: F) -> Result<T, Errors>
    where
        F: FnOnce(&mut Auction) -> Result<T, Errors>,
    {
        let mut store = self.write()?;
        let mut auction = store.get(id)?;
        let result = f(&mut auction)?;
        store.put(id, auction)?;
        Self::flush_logged(&mut **store, "update", id);
        Ok(result)
    }

    pub fn export_snapshot(&self, id: &str, now: DateTime<Utc>) -> Result<AuctionSnapshot, Errors> {
        self.read()?.get(id)?.snapshot(now)
    }
}
