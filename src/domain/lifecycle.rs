// src/domain/lifecycle.rs
use chrono::{DateTime, Utc};
use super::auctions::{validate_roster, Auction, NewAuction};
use super::bids::Bidder;
use super::core::{AuctionId, AuctionStatus, Errors};

pub const MIN_BIDDERS_TO_START: usize = 2;

fn require_status(auction: &Auction, expected: AuctionStatus, operation: &'static str) -> Result<(), Errors> {
    if auction.status == expected {
        Ok(())
    } else {
        Err(Errors::InvalidState {
            auction_id: auction.id.clone(),
            status: auction.status,
            operation,
        })
    }
}

pub fn new_auction(id: AuctionId, request: NewAuction, now: DateTime<Utc>) -> Result<Auction, Errors> {
    request.validate()?;

    Ok(Auction {
        id,
        title: request.title.trim().to_string(),
        created_at: now,
        starting_price: request.starting_price,
        price_step: request.price_step,
        bidders: request.bidders,
        bid_history: Vec::new(),
        current_round: 0,
        highest_bid: 0,
        highest_bidder: String::new(),
        status: AuctionStatus::NotStarted,
        started_at: None,
        ended_at: None,
    })
}

/// NotStarted -> InProgress
pub fn start(auction: &mut Auction, now: DateTime<Utc>) -> Result<(), Errors> {
    require_status(auction, AuctionStatus::NotStarted, "start")?;
    if auction.bidders.len() < MIN_BIDDERS_TO_START {
        return Err(Errors::InsufficientBidders(auction.bidders.len()));
    }

    auction.status = AuctionStatus::InProgress;
    auction.current_round = 1;
    auction.started_at = Some(now);
    Ok(())
}

/// InProgress -> Completed. An auction without bids completes with no winner.
pub fn end(auction: &mut Auction, now: DateTime<Utc>) -> Result<(), Errors> {
    require_status(auction, AuctionStatus::InProgress, "end")?;

    auction.status = AuctionStatus::Completed;
    auction.ended_at = Some(now);
    Ok(())
}

/// Next free numeric id, used when a bidder is registered without one.
fn next_bidder_id(bidders: &[Bidder]) -> String {
    let next = bidders
        .iter()
        .filter_map(|b| b.id.parse::<u64>().ok())
        .max()
        .map_or(1, |max| max + 1);
    next.to_string()
}

pub fn add_bidder(auction: &mut Auction, mut bidder: Bidder) -> Result<Bidder, Errors> {
    require_status(auction, AuctionStatus::NotStarted, "add bidders to")?;

    if bidder.name.trim().is_empty() {
        return Err(Errors::Validation("Bidder name is required".to_string()));
    }
    if bidder.id.trim().is_empty() {
        bidder.id = next_bidder_id(&auction.bidders);
    }
    if auction.bidders.iter().any(|b| b.id == bidder.id) {
        return Err(Errors::DuplicateBidder(bidder.id));
    }
    if auction.bidders.iter().any(|b| b.name == bidder.name) {
        return Err(Errors::DuplicateBidder(bidder.name));
    }

    auction.bidders.push(bidder.clone());
    Ok(bidder)
}

pub fn remove_bidder(auction: &mut Auction, bidder_id: &str) -> Result<Bidder, Errors> {
    require_status(auction, AuctionStatus::NotStarted, "remove bidders from")?;

    let index = auction
        .bidders
        .iter()
        .position(|b| b.id == bidder_id)
        .ok_or_else(|| Errors::BidderNotFound(bidder_id.to_string()))?;
    Ok(auction.bidders.remove(index))
}

/// Replaces the whole roster.
pub fn set_bidders(auction: &mut Auction, bidders: Vec<Bidder>) -> Result<(), Errors> {
    require_status(auction, AuctionStatus::NotStarted, "change bidders of")?;
    validate_roster(&bidders)?;

    auction.bidders = bidders;
    Ok(())
}
