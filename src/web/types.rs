use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::domain::{AmountValue, Auction, AuctionId, AuctionStatus, Bid, Bidder, BidderId, NewAuction};
use crate::persistence::Repository;

#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<Repository>,
    pub import_timeout: Duration,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
    pub message: String,
    #[serde(rename = "timeToWait", skip_serializing_if = "Option::is_none")]
    pub time_to_wait: Option<i64>,
    #[serde(rename = "minimumBid", skip_serializing_if = "Option::is_none")]
    pub minimum_bid: Option<AmountValue>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BidderRequest {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub address: String,
}

impl From<BidderRequest> for Bidder {
    fn from(req: BidderRequest) -> Self {
        Bidder {
            id: req.id.trim().to_string(),
            name: req.name.trim().to_string(),
            address: req.address.trim().to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAuctionRequest {
    pub title: String,
    pub starting_price: AmountValue,
    pub price_step: AmountValue,
    #[serde(default)]
    pub bidders: Vec<BidderRequest>,
}

impl CreateAuctionRequest {
    pub fn into_new_auction(self) -> NewAuction {
        NewAuction {
            title: self.title,
            starting_price: self.starting_price,
            price_step: self.price_step,
            bidders: self.bidders.into_iter().map(Bidder::from).collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceBidRequest {
    pub bidder_id: BidderId,
    pub amount: AmountValue,
}

#[derive(Debug, Deserialize)]
pub struct SetBiddersRequest {
    pub bidders: Vec<BidderRequest>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuctionItem {
    pub id: AuctionId,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub status: AuctionStatus,
    pub bidder_count: usize,
    pub bid_count: usize,
    pub highest_bid: AmountValue,
}

impl From<&Auction> for AuctionItem {
    fn from(auction: &Auction) -> Self {
        AuctionItem {
            id: auction.id.clone(),
            title: auction.title.clone(),
            created_at: auction.created_at,
            status: auction.status,
            bidder_count: auction.bidders.len(),
            bid_count: auction.bid_history.len(),
            highest_bid: auction.highest_bid,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentBids {
    pub auction_id: AuctionId,
    pub status: AuctionStatus,
    pub current_round: u32,
    pub highest_bid: AmountValue,
    pub highest_bidder: BidderId,
    pub highest_bidder_name: String,
    pub minimum_next_bid: AmountValue,
    pub last_bid: Option<Bid>,
}

impl From<&Auction> for CurrentBids {
    fn from(auction: &Auction) -> Self {
        CurrentBids {
            auction_id: auction.id.clone(),
            status: auction.status,
            current_round: auction.current_round,
            highest_bid: auction.highest_bid,
            highest_bidder: auction.highest_bidder.clone(),
            highest_bidder_name: auction.winner().map(|b| b.name.clone()).unwrap_or_default(),
            minimum_next_bid: auction.min_required_bid(),
            last_bid: auction.bid_history.last().cloned(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BidHistory {
    pub auction_id: AuctionId,
    pub total_bids: usize,
    pub bid_history: Vec<Bid>,
}

#[derive(Debug, Serialize)]
pub struct ImportAccepted {
    pub message: String,
    pub count: usize,
}
