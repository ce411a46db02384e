use chrono::{DateTime, Utc};
use log::{debug, info};
use serde::Serialize;
use uuid::Uuid;

use crate::persistence::Repository;
use super::admission::admit;
use super::auctions::{Auction, AuctionSnapshot, NewAuction};
use super::bids::{Bid, Bidder};
use super::core::{AmountValue, AuctionId, BidderId, Errors};
use super::lifecycle;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    CreateAuction {
        timestamp: DateTime<Utc>,
        auction: NewAuction,
    },
    StartAuction {
        timestamp: DateTime<Utc>,
        auction_id: AuctionId,
    },
    EndAuction {
        timestamp: DateTime<Utc>,
        auction_id: AuctionId,
    },
    PlaceBid {
        timestamp: DateTime<Utc>,
        auction_id: AuctionId,
        bidder_id: BidderId,
        amount: AmountValue,
    },
    AddBidder {
        auction_id: AuctionId,
        bidder: Bidder,
    },
    RemoveBidder {
        auction_id: AuctionId,
        bidder_id: BidderId,
    },
    SetBidders {
        auction_id: AuctionId,
        bidders: Vec<Bidder>,
    },
    DeleteAuction {
        auction_id: AuctionId,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "$type")]
pub enum CommandSuccess {
    #[serde(rename = "AuctionCreated")]
    AuctionCreated { auction: Auction },

    #[serde(rename = "AuctionStarted")]
    AuctionStarted { auction: Auction },

    #[serde(rename = "AuctionEnded")]
    AuctionEnded { auction: Auction },

    #[serde(rename = "BidAccepted")]
    BidAccepted { bid: Bid, auction: Auction },

    #[serde(rename = "BidderAdded")]
    BidderAdded {
        #[serde(rename = "auctionId")]
        auction_id: AuctionId,
        bidder: Bidder,
    },

    #[serde(rename = "BidderRemoved")]
    BidderRemoved {
        #[serde(rename = "auctionId")]
        auction_id: AuctionId,
        bidder: Bidder,
    },

    #[serde(rename = "BiddersSet")]
    BiddersSet {
        #[serde(rename = "auctionId")]
        auction_id: AuctionId,
        bidders: Vec<Bidder>,
    },

    #[serde(rename = "AuctionDeleted")]
    AuctionDeleted {
        #[serde(rename = "auctionId")]
        auction_id: AuctionId,
    },
}

pub fn create_auction(repository: &Repository, request: NewAuction, now: DateTime<Utc>) -> Result<Auction, Errors> {
    let auction = lifecycle::new_auction(Uuid::new_v4().to_string(), request, now)?;
    let auction = repository.create_auction(auction)?;
    info!("Auction created: {} (ID: {})", auction.title, auction.id);
    Ok(auction)
}

pub fn start_auction(repository: &Repository, id: &str, now: DateTime<Utc>) -> Result<Auction, Errors> {
    let auction = repository.modify(id, |auction| {
        lifecycle::start(auction, now)?;
        Ok(auction.clone())
    })?;
    info!("Auction started: {} with {} bidders", auction.id, auction.bidders.len());
    Ok(auction)
}

pub fn end_auction(repository: &Repository, id: &str, now: DateTime<Utc>) -> Result<Auction, Errors> {
    let auction = repository.modify(id, |auction| {
        lifecycle::end(auction, now)?;
        Ok(auction.clone())
    })?;
    info!(
        "Auction ended: {} after {} bids, highest bid {} by '{}'",
        auction.id,
        auction.bid_history.len(),
        auction.highest_bid,
        auction.highest_bidder
    );
    Ok(auction)
}

pub fn place_bid(
    repository: &Repository,
    id: &str,
    bidder_id: &str,
    amount: AmountValue,
    now: DateTime<Utc>,
) -> Result<(Bid, Auction), Errors> {
    let result = repository.modify(id, |auction| {
        let (bid, updated) = admit(auction, bidder_id, amount, now)?;
        *auction = updated;
        Ok((bid, auction.clone()))
    });

    match &result {
        Ok((bid, _)) => info!("Bid recorded: auction={}, bidder={}, amount={}", id, bid.bidder_id, bid.amount),
        Err(err) => debug!("Bid rejected ({}): auction={}, bidder={}, amount={}", err.code(), id, bidder_id, amount),
    }
    result
}

pub fn export_snapshot(repository: &Repository, id: &str, now: DateTime<Utc>) -> Result<AuctionSnapshot, Errors> {
    repository.export_snapshot(id, now)
}

pub fn handle(command: Command, repository: &Repository) -> Result<CommandSuccess, Errors> {
    match command {
        Command::CreateAuction { timestamp, auction } => {
            let auction = create_auction(repository, auction, timestamp)?;
            Ok(CommandSuccess::AuctionCreated { auction })
        }

        Command::StartAuction { timestamp, auction_id } => {
            let auction = start_auction(repository, &auction_id, timestamp)?;
            Ok(CommandSuccess::AuctionStarted { auction })
        }

        Command::EndAuction { timestamp, auction_id } => {
            let auction = end_auction(repository, &auction_id, timestamp)?;
            Ok(CommandSuccess::AuctionEnded { auction })
        }

        Command::PlaceBid { timestamp, auction_id, bidder_id, amount } => {
            let (bid, auction) = place_bid(repository, &auction_id, &bidder_id, amount, timestamp)?;
            Ok(CommandSuccess::BidAccepted { bid, auction })
        }

        Command::AddBidder { auction_id, bidder } => {
            let bidder = repository.modify(&auction_id, |auction| lifecycle::add_bidder(auction, bidder))?;
            info!("Added bidder '{}' (ID: {}) to auction {}", bidder.name, bidder.id, auction_id);
            Ok(CommandSuccess::BidderAdded { auction_id, bidder })
        }

        Command::RemoveBidder { auction_id, bidder_id } => {
            let bidder = repository.modify(&auction_id, |auction| lifecycle::remove_bidder(auction, &bidder_id))?;
            info!("Removed bidder '{}' (ID: {}) from auction {}", bidder.name, bidder.id, auction_id);
            Ok(CommandSuccess::BidderRemoved { auction_id, bidder })
        }

        Command::SetBidders { auction_id, bidders } => {
            let bidders = repository.modify(&auction_id, |auction| {
                lifecycle::set_bidders(auction, bidders)?;
                Ok(auction.bidders.clone())
            })?;
            info!("Set {} bidders for auction {}", bidders.len(), auction_id);
            Ok(CommandSuccess::BiddersSet { auction_id, bidders })
        }

        Command::DeleteAuction { auction_id } => {
            repository.delete_auction(&auction_id)?;
            info!("Auction deleted: {}", auction_id);
            Ok(CommandSuccess::AuctionDeleted { auction_id })
        }
    }
}
