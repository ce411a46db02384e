// src/domain/core.rs
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::persistence::StoreError;

pub type AuctionId = String;
pub type BidderId = String;

/// Smallest currency unit. Signed so that a negative amount coming from the
/// outside can be represented and rejected rather than failing to parse.
pub type AmountValue = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AuctionStatus {
    NotStarted,
    InProgress,
    Completed,
}

impl Default for AuctionStatus {
    fn default() -> Self {
        AuctionStatus::NotStarted
    }
}

impl fmt::Display for AuctionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuctionStatus::NotStarted => write!(f, "notStarted"),
            AuctionStatus::InProgress => write!(f, "inProgress"),
            AuctionStatus::Completed => write!(f, "completed"),
        }
    }
}

impl FromStr for AuctionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "notStarted" | "pending" => Ok(AuctionStatus::NotStarted),
            "inProgress" => Ok(AuctionStatus::InProgress),
            "completed" => Ok(AuctionStatus::Completed),
            _ => Err(format!("Unknown auction status: {}", s)),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Errors {
    #[error("Unknown auction: {0}")]
    UnknownAuction(AuctionId),

    #[error("Bidder not found: {0}")]
    BidderNotFound(BidderId),

    #[error("Auction already exists: {0}")]
    AuctionAlreadyExists(AuctionId),

    #[error("Cannot {operation} auction {auction_id} while it is {status}")]
    InvalidState {
        auction_id: AuctionId,
        status: AuctionStatus,
        operation: &'static str,
    },

    #[error("Invalid auction data: {0}")]
    Validation(String),

    #[error("At least two bidders are required to start an auction, found {0}")]
    InsufficientBidders(usize),

    #[error("Bid amount must be positive, got {0}")]
    InvalidAmount(AmountValue),

    #[error("Bids can only be placed on auctions in progress, auction is {0}")]
    NotInProgress(AuctionStatus),

    #[error("Bidder not registered for this auction: {0}")]
    UnknownBidder(BidderId),

    #[error("Bid of {amount} from {bidder_id} has already been submitted")]
    DuplicateBid {
        bidder_id: BidderId,
        amount: AmountValue,
    },

    #[error("Please wait {wait_millis}ms before placing another bid")]
    Throttled { wait_millis: i64 },

    #[error("Bid must be at least {min_required}")]
    BidTooLow { min_required: AmountValue },

    #[error("Bidder already registered: {0}")]
    DuplicateBidder(String),

    #[error("Storage failure: {0}")]
    Store(StoreError),
}

impl Errors {
    /// Stable identifier clients can match on.
    pub fn code(&self) -> &'static str {
        match self {
            Errors::UnknownAuction(_) | Errors::BidderNotFound(_) => "NOT_FOUND",
            Errors::AuctionAlreadyExists(_) => "ALREADY_EXISTS",
            Errors::InvalidState { .. } => "INVALID_STATE",
            Errors::Validation(_) => "VALIDATION_ERROR",
            Errors::InsufficientBidders(_) => "INSUFFICIENT_BIDDERS",
            Errors::InvalidAmount(_) => "INVALID_AMOUNT",
            Errors::NotInProgress(_) => "NOT_IN_PROGRESS",
            Errors::UnknownBidder(_) => "UNKNOWN_BIDDER",
            Errors::DuplicateBid { .. } => "DUPLICATE_BID",
            Errors::Throttled { .. } => "THROTTLED",
            Errors::BidTooLow { .. } => "BID_TOO_LOW",
            Errors::DuplicateBidder(_) => "DUPLICATE_BIDDER",
            Errors::Store(_) => "STORE_ERROR",
        }
    }
}

impl From<StoreError> for Errors {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => Errors::UnknownAuction(id),
            other => Errors::Store(other),
        }
    }
}
