#![allow(dead_code)]
use auction_desk::domain::{lifecycle, Auction, AuctionStatus, Bidder, NewAuction};
use auction_desk::persistence::{MemoryStore, Repository};
use chrono::{DateTime, Duration, TimeZone, Utc};
// See https://users.rust-lang.org/t/sharing-code-and-macros-in-tests-directory/3098/7

// Sample data for tests
pub fn sample_auction_id() -> String {
    "auction-1".to_string()
}

pub fn sample_title() -> String {
    "Land lot 42".to_string()
}

pub fn sample_created_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap()
}

pub fn sample_started_at() -> DateTime<Utc> {
    sample_created_at() + Duration::minutes(30)
}

/// A moment well after start, used as the time of the first bid.
pub fn sample_bid_time() -> DateTime<Utc> {
    sample_started_at() + Duration::minutes(5)
}

pub fn bidder_a() -> Bidder {
    Bidder::new("A", "Alice", "1 Main Street")
}

pub fn bidder_b() -> Bidder {
    Bidder::new("B", "Bob", "2 Main Street")
}

pub fn bidder_c() -> Bidder {
    Bidder::new("C", "Carol", "3 Main Street")
}

pub fn sample_new_auction() -> NewAuction {
    NewAuction {
        title: sample_title(),
        starting_price: 100,
        price_step: 10,
        bidders: vec![bidder_a(), bidder_b()],
    }
}

pub fn sample_auction() -> Auction {
    lifecycle::new_auction(sample_auction_id(), sample_new_auction(), sample_created_at()).unwrap()
}

pub fn sample_started_auction() -> Auction {
    let mut auction = sample_auction();
    lifecycle::start(&mut auction, sample_started_at()).unwrap();
    assert_eq!(auction.status, AuctionStatus::InProgress);
    auction
}

pub fn repository_with(auctions: Vec<Auction>) -> Repository {
    Repository::new(MemoryStore::with_auctions(auctions))
}

/// Invariants that must hold after every mutation.
pub fn assert_consistent(auction: &Auction) {
    match auction.bid_history.last() {
        Some(last) => {
            assert_eq!(auction.highest_bid, last.amount);
            assert_eq!(auction.highest_bidder, last.bidder_id);
        }
        None => {
            assert_eq!(auction.highest_bid, 0);
            assert_eq!(auction.highest_bidder, "");
        }
    }
    for pair in auction.bid_history.windows(2) {
        assert!(pair[0].amount < pair[1].amount, "bids must strictly increase: {:?}", pair);
    }
}
