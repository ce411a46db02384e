use auction_desk::domain::{admit, lifecycle, AuctionStatus, Errors, THROTTLE_WINDOW_MILLIS};
use chrono::Duration;
#[path = "utils/mod.rs"]
mod utils;
use utils::*;

#[test]
fn test_normal_bidding_flow() {
    let auction = sample_started_auction();
    let t = sample_bid_time();

    let (bid, auction) = admit(&auction, "A", 100, t).unwrap();
    assert_eq!(bid.amount, 100);
    assert_eq!(bid.bidder_name, "Alice");
    assert_eq!(auction.highest_bid, 100);
    assert_eq!(auction.highest_bidder, "A");

    let result = admit(&auction, "B", 105, t + Duration::seconds(1));
    assert_eq!(result.unwrap_err(), Errors::BidTooLow { min_required: 110 });

    let (_, auction) = admit(&auction, "B", 110, t + Duration::seconds(2)).unwrap();
    assert_eq!(auction.highest_bid, 110);
    assert_eq!(auction.highest_bidder, "B");
    assert_eq!(auction.bid_history.len(), 2);
    assert_consistent(&auction);
}

#[test]
fn test_first_bid_must_reach_starting_price() {
    let auction = sample_started_auction();
    let result = admit(&auction, "A", 99, sample_bid_time());
    assert_eq!(result.unwrap_err(), Errors::BidTooLow { min_required: 100 });
}

#[test]
fn test_non_positive_amount_is_rejected_before_anything_else() {
    // Not started and the bidder is unknown, yet the amount check comes first.
    let auction = sample_auction();
    assert_eq!(admit(&auction, "nobody", 0, sample_bid_time()).unwrap_err(), Errors::InvalidAmount(0));
    assert_eq!(admit(&auction, "nobody", -5, sample_bid_time()).unwrap_err(), Errors::InvalidAmount(-5));
}

#[test]
fn test_bids_require_auction_in_progress() {
    let auction = sample_auction();
    let result = admit(&auction, "nobody", 100, sample_bid_time());
    assert_eq!(result.unwrap_err(), Errors::NotInProgress(AuctionStatus::NotStarted));

    let mut completed = sample_started_auction();
    lifecycle::end(&mut completed, sample_bid_time()).unwrap();
    let result = admit(&completed, "A", 100, sample_bid_time());
    assert_eq!(result.unwrap_err(), Errors::NotInProgress(AuctionStatus::Completed));
}

#[test]
fn test_unknown_bidder_is_rejected() {
    let auction = sample_started_auction();
    let result = admit(&auction, "C", 100, sample_bid_time());
    assert_eq!(result.unwrap_err(), Errors::UnknownBidder("C".to_string()));
}

#[test]
fn test_duplicate_bid_wins_over_throttle() {
    let auction = sample_started_auction();
    let t = sample_bid_time();
    let (_, auction) = admit(&auction, "A", 100, t).unwrap();

    let result = admit(&auction, "A", 100, t + Duration::milliseconds(200));
    assert_eq!(
        result.unwrap_err(),
        Errors::DuplicateBid {
            bidder_id: "A".to_string(),
            amount: 100
        }
    );
}

#[test]
fn test_duplicate_bid_is_rejected_regardless_of_elapsed_time() {
    let auction = sample_started_auction();
    let t = sample_bid_time();
    let (_, auction) = admit(&auction, "A", 100, t).unwrap();
    let (_, auction) = admit(&auction, "B", 110, t + Duration::seconds(5)).unwrap();

    let result = admit(&auction, "A", 100, t + Duration::hours(1));
    assert!(matches!(result, Err(Errors::DuplicateBid { .. })));
}

#[test]
fn test_throttle_window_boundary() {
    let auction = sample_started_auction();
    let t = sample_bid_time();
    let (_, auction) = admit(&auction, "A", 100, t).unwrap();
    let (_, auction) = admit(&auction, "B", 110, t + Duration::milliseconds(500)).unwrap();

    let result = admit(&auction, "A", 120, t + Duration::milliseconds(1999));
    assert_eq!(result.unwrap_err(), Errors::Throttled { wait_millis: 1 });

    let (bid, auction) = admit(&auction, "A", 120, t + Duration::milliseconds(THROTTLE_WINDOW_MILLIS)).unwrap();
    assert_eq!(bid.amount, 120);
    assert_consistent(&auction);
}

#[test]
fn test_throttle_is_checked_before_minimum_bid() {
    let auction = sample_started_auction();
    let t = sample_bid_time();
    let (_, auction) = admit(&auction, "A", 100, t).unwrap();

    let result = admit(&auction, "A", 50, t + Duration::milliseconds(500));
    assert_eq!(result.unwrap_err(), Errors::Throttled { wait_millis: 1500 });
}

#[test]
fn test_throttle_only_considers_latest_bid_of_bidder() {
    let auction = sample_started_auction();
    let t = sample_bid_time();
    let (_, auction) = admit(&auction, "A", 100, t).unwrap();
    let (_, auction) = admit(&auction, "B", 110, t + Duration::seconds(1)).unwrap();
    let (_, auction) = admit(&auction, "A", 120, t + Duration::seconds(10)).unwrap();
    let (_, auction) = admit(&auction, "B", 130, t + Duration::seconds(11)).unwrap();

    // Measured from A's bid at 10s, not the one at 0s.
    let result = admit(&auction, "A", 140, t + Duration::milliseconds(11_500));
    assert_eq!(result.unwrap_err(), Errors::Throttled { wait_millis: 500 });

    // Another bidder is never slowed down by A.
    let result = admit(&auction, "B", 140, t + Duration::milliseconds(13_000));
    assert!(result.is_ok());
}

#[test]
fn test_accepted_bid_records_round_and_advances_counter() {
    let auction = sample_started_auction();
    assert_eq!(auction.current_round, 1);

    let (bid, auction) = admit(&auction, "A", 100, sample_bid_time()).unwrap();
    assert_eq!(bid.round, 1);
    assert_eq!(auction.current_round, 2);

    let (bid, auction) = admit(&auction, "B", 110, sample_bid_time() + Duration::seconds(1)).unwrap();
    assert_eq!(bid.round, 2);
    assert_eq!(auction.current_round, 3);
}

#[test]
fn test_round_counter_saturates() {
    let mut auction = sample_started_auction();
    auction.current_round = u32::MAX;

    let (bid, auction) = admit(&auction, "A", 100, sample_bid_time()).unwrap();
    assert_eq!(bid.round, u32::MAX);
    assert_eq!(auction.current_round, u32::MAX);
}

#[test]
fn test_admission_does_not_touch_input_auction() {
    let auction = sample_started_auction();
    let before = auction.clone();

    let (_, updated) = admit(&auction, "A", 100, sample_bid_time()).unwrap();
    assert_eq!(auction, before);
    assert_ne!(updated, before);
}

#[test]
fn test_accepted_bids_strictly_increase() {
    let mut auction = sample_started_auction();
    let mut t = sample_bid_time();
    let attempts = [("A", 100), ("B", 100), ("B", 115), ("A", 120), ("B", 125), ("A", 200), ("B", 205), ("B", 210)];

    for (bidder, amount) in attempts {
        t = t + Duration::seconds(3);
        if let Ok((_, updated)) = admit(&auction, bidder, amount, t) {
            auction = updated;
        }
        assert_consistent(&auction);
    }

    let amounts: Vec<i64> = auction.bid_history.iter().map(|b| b.amount).collect();
    assert_eq!(amounts, vec![100, 115, 125, 200, 210]);
}
