use chrono::Utc;
use log::{info, warn};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::ffi::OsString;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::domain::{AmountValue, Auction, AuctionId, AuctionStatus, Bid, Bidder};
use super::{AuctionSet, Database, StoreError};

/// Id given to the auction recovered from a single-auction document.
pub const LEGACY_AUCTION_ID: &str = "legacy";

fn io_error(path: &Path, err: std::io::Error) -> StoreError {
    StoreError::Io {
        path: path.display().to_string(),
        message: err.to_string(),
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}

/// Layout written by the single-auction version of the service.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct LegacyAuctionData {
    bidders: Option<Vec<Bidder>>,
    starting_price: AmountValue,
    price_step: AmountValue,
    bid_history: Option<Vec<Bid>>,
    current_round: u32,
    highest_bid: AmountValue,
    highest_bidder: String,
    auction_status: String,
}

impl LegacyAuctionData {
    fn is_legacy(value: &Value) -> bool {
        ["bidHistory", "auctionStatus", "startingPrice"]
            .iter()
            .any(|key| value.get(key).is_some())
    }

    fn into_auction(self) -> Auction {
        let bid_history = self.bid_history.unwrap_or_default();
        let status = self.auction_status.parse::<AuctionStatus>().unwrap_or_else(|err| {
            warn!("{}, treating legacy auction as not started", err);
            AuctionStatus::NotStarted
        });
        let created_at = bid_history.first().map(|b| b.timestamp).unwrap_or_else(Utc::now);

        Auction {
            id: LEGACY_AUCTION_ID.to_string(),
            title: "Legacy auction".to_string(),
            created_at,
            starting_price: self.starting_price,
            price_step: self.price_step,
            bidders: self.bidders.unwrap_or_default(),
            bid_history,
            current_round: self.current_round,
            highest_bid: self.highest_bid,
            highest_bidder: self.highest_bidder,
            status,
            started_at: None,
            ended_at: None,
        }
    }
}

pub fn parse_document(text: &str) -> Result<AuctionSet, StoreError> {
    if text.trim().is_empty() {
        return Ok(AuctionSet::default());
    }

    let value: Value = serde_json::from_str(text)
        .map_err(|e| StoreError::Serialization(format!("Failed to parse auction document: {}", e)))?;
    let object = match value.as_object() {
        Some(object) => object,
        None => {
            return Err(StoreError::Serialization(
                "Auction document must be a JSON object".to_string(),
            ))
        }
    };

    let is_empty = object.is_empty();

    match object.get("auctions").map(Value::is_null) {
        Some(true) => Ok(AuctionSet::default()),
        Some(false) => serde_json::from_value(value)
            .map_err(|e| StoreError::Serialization(format!("Failed to parse auctions: {}", e))),
        None if LegacyAuctionData::is_legacy(&value) => {
            let legacy: LegacyAuctionData = serde_json::from_value(value)
                .map_err(|e| StoreError::Serialization(format!("Failed to parse legacy auction: {}", e)))?;
            let auction = legacy.into_auction();
            info!("Loaded legacy single-auction document as auction {}", auction.id);
            Ok(AuctionSet {
                auctions: HashMap::from([(auction.id.clone(), auction)]),
            })
        }
        None if is_empty => Ok(AuctionSet::default()),
        // Unknown layouts are refused so the next flush cannot overwrite them.
        None => Err(StoreError::Serialization(
            "Unrecognised auction document layout".to_string(),
        )),
    }
}

pub fn read_document<P: AsRef<Path>>(path: P) -> Result<AuctionSet, StoreError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| io_error(path, e))?;
    parse_document(&text)
}

/// Writes next to `path` first and renames over it, so readers only ever see
/// a complete document.
pub fn write_document<P: AsRef<Path>>(path: P, document: &AuctionSet) -> Result<(), StoreError> {
    let path = path.as_ref();
    let json = serde_json::to_vec_pretty(document)
        .map_err(|e| StoreError::Serialization(e.to_string()))?;

    let temp = temp_path(path);
    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&temp)
        .map_err(|e| io_error(&temp, e))?;
    file.write_all(&json).map_err(|e| io_error(&temp, e))?;
    file.sync_all().map_err(|e| io_error(&temp, e))?;
    drop(file);

    fs::rename(&temp, path).map_err(|e| io_error(path, e))
}

/// `AuctionSet` held in memory and persisted as one JSON file.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    document: AuctionSet,
    dirty: bool,
}

impl JsonFileStore {
    /// Loads `data_dir/file_name`, creating the directory and an empty
    /// document when missing.
    pub fn open<P: AsRef<Path>>(data_dir: P, file_name: &str) -> Result<Self, StoreError> {
        let data_dir = data_dir.as_ref();
        fs::create_dir_all(data_dir).map_err(|e| io_error(data_dir, e))?;
        let path = data_dir.join(file_name);

        let document = if path.exists() {
            read_document(&path)?
        } else {
            let empty = AuctionSet::default();
            write_document(&path, &empty)?;
            empty
        };

        info!("Opened auction store {} with {} auction(s)", path.display(), document.auctions.len());
        Ok(JsonFileStore {
            path,
            document,
            dirty: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Database for JsonFileStore {
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
        self.dirty = true;
        Ok(())
    }

    fn delete(&mut self, id: &str) -> Result<(), StoreError> {
        self.document
            .auctions
            .remove(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        self.dirty = true;
        Ok(())
    }

    // Stays dirty on failure so the next flush retries the write.
    fn flush(&mut self) -> Result<(), StoreError> {
        if !self.dirty {
            return Ok(());
        }
        write_document(&self.path, &self.document)?;
        self.dirty = false;
        Ok(())
    }
}
