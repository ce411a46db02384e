// src/domain/auctions.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use super::bids::{Bid, Bidder};
use super::core::{AmountValue, AuctionId, AuctionStatus, BidderId, Errors};

pub const MIN_TITLE_LENGTH: usize = 3;
pub const MAX_TITLE_LENGTH: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Auction {
    pub id: AuctionId,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub starting_price: AmountValue,
    pub price_step: AmountValue,
    #[serde(default)]
    pub bidders: Vec<Bidder>,
    #[serde(default)]
    pub bid_history: Vec<Bid>,
    #[serde(default)]
    pub current_round: u32,
    #[serde(default)]
    pub highest_bid: AmountValue,
    #[serde(default)]
    pub highest_bidder: BidderId,
    #[serde(default)]
    pub status: AuctionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,
}

impl Auction {
    pub fn find_bidder(&self, bidder_id: &str) -> Option<&Bidder> {
        self.bidders.iter().find(|b| b.id == bidder_id)
    }

    /// Lowest amount the next bid must reach.
    pub fn min_required_bid(&self) -> AmountValue {
        if self.highest_bid == 0 {
            self.starting_price
        } else {
            self.highest_bid.saturating_add(self.price_step)
        }
    }

    /// Most recent bid recorded for `bidder_id`.
    pub fn last_bid_by(&self, bidder_id: &str) -> Option<&Bid> {
        self.bid_history.iter().rev().find(|b| b.bidder_id == bidder_id)
    }

    pub fn winner(&self) -> Option<&Bidder> {
        if self.highest_bidder.is_empty() {
            return None;
        }
        self.find_bidder(&self.highest_bidder)
    }

    pub fn snapshot(&self, now: DateTime<Utc>) -> Result<AuctionSnapshot, Errors> {
        if self.status != AuctionStatus::Completed {
            return Err(Errors::InvalidState {
                auction_id: self.id.clone(),
                status: self.status,
                operation: "export",
            });
        }

        Ok(AuctionSnapshot {
            auction_id: self.id.clone(),
            title: self.title.clone(),
            starting_price: self.starting_price,
            price_step: self.price_step,
            total_bids: self.bid_history.len(),
            bid_history: self.bid_history.clone(),
            winner_id: self.highest_bidder.clone(),
            winner_name: self.winner().map(|b| b.name.clone()).unwrap_or_default(),
            winning_bid: self.highest_bid,
            end_time: self.ended_at.unwrap_or(now),
        })
    }
}

/// Input for creating an auction, already typed by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAuction {
    pub title: String,
    pub starting_price: AmountValue,
    pub price_step: AmountValue,
    pub bidders: Vec<Bidder>,
}

impl NewAuction {
    pub fn validate(&self) -> Result<(), Errors> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(Errors::Validation("Auction title is required".to_string()));
        }
        let length = title.chars().count();
        if !(MIN_TITLE_LENGTH..=MAX_TITLE_LENGTH).contains(&length) {
            return Err(Errors::Validation(format!(
                "Auction title must be between {} and {} characters",
                MIN_TITLE_LENGTH, MAX_TITLE_LENGTH
            )));
        }
        if self.starting_price <= 0 {
            return Err(Errors::Validation("Starting price must be positive".to_string()));
        }
        if self.price_step <= 0 {
            return Err(Errors::Validation("Price step must be positive".to_string()));
        }
        if self.price_step > self.starting_price {
            return Err(Errors::Validation("Price step cannot exceed starting price".to_string()));
        }
        validate_roster(&self.bidders).map_err(|err| match err {
            Errors::DuplicateBidder(who) => Errors::Validation(format!("Duplicate bidder: {}", who)),
            other => other,
        })
    }
}

/// Every bidder needs a non-empty id and name; ids and names are unique.
pub fn validate_roster(bidders: &[Bidder]) -> Result<(), Errors> {
    let mut ids = HashSet::new();
    let mut names = HashSet::new();

    for bidder in bidders {
        if bidder.id.trim().is_empty() || bidder.name.trim().is_empty() {
            return Err(Errors::Validation("Bidder id and name are required".to_string()));
        }
        if !ids.insert(bidder.id.as_str()) {
            return Err(Errors::DuplicateBidder(bidder.id.clone()));
        }
        if !names.insert(bidder.name.as_str()) {
            return Err(Errors::DuplicateBidder(bidder.name.clone()));
        }
    }
    Ok(())
}

/// Read-only summary of a completed auction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuctionSnapshot {
    pub auction_id: AuctionId,
    pub title: String,
    pub starting_price: AmountValue,
    pub price_step: AmountValue,
    pub total_bids: usize,
    pub bid_history: Vec<Bid>,
    pub winner_id: BidderId,
    pub winner_name: String,
    pub winning_bid: AmountValue,
    pub end_time: DateTime<Utc>,
}
