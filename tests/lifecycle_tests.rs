use auction_desk::domain::{lifecycle, AuctionStatus, Bidder, Errors, NewAuction};
use chrono::Duration;
#[path = "utils/mod.rs"]
mod utils;
use utils::*;

fn new_auction_with(f: impl FnOnce(&mut NewAuction)) -> Result<auction_desk::domain::Auction, Errors> {
    let mut request = sample_new_auction();
    f(&mut request);
    lifecycle::new_auction(sample_auction_id(), request, sample_created_at())
}

#[test]
fn test_new_auction_defaults() {
    let auction = sample_auction();
    assert_eq!(auction.status, AuctionStatus::NotStarted);
    assert_eq!(auction.current_round, 0);
    assert_eq!(auction.highest_bid, 0);
    assert_eq!(auction.highest_bidder, "");
    assert!(auction.bid_history.is_empty());
    assert_eq!(auction.created_at, sample_created_at());
    assert_consistent(&auction);
}

#[test]
fn test_creation_validation() {
    let cases: Vec<(&str, Box<dyn FnOnce(&mut NewAuction)>)> = vec![
        ("empty title", Box::new(|r: &mut NewAuction| r.title = "   ".to_string())),
        ("short title", Box::new(|r: &mut NewAuction| r.title = "ab".to_string())),
        ("long title", Box::new(|r: &mut NewAuction| r.title = "x".repeat(101))),
        ("zero starting price", Box::new(|r: &mut NewAuction| r.starting_price = 0)),
        ("negative step", Box::new(|r: &mut NewAuction| r.price_step = -1)),
        ("step above starting price", Box::new(|r: &mut NewAuction| r.price_step = 101)),
        ("blank bidder id", Box::new(|r: &mut NewAuction| r.bidders.push(Bidder::new(" ", "Dave", "")))),
        ("duplicate bidder id", Box::new(|r: &mut NewAuction| r.bidders.push(Bidder::new("A", "Dave", "")))),
        ("duplicate bidder name", Box::new(|r: &mut NewAuction| r.bidders.push(Bidder::new("D", "Alice", "")))),
    ];

    for (name, change) in cases {
        let result = new_auction_with(change);
        assert!(matches!(result, Err(Errors::Validation(_))), "{}: {:?}", name, result);
    }
}

#[test]
fn test_step_equal_to_starting_price_is_allowed() {
    let auction = new_auction_with(|r| r.price_step = r.starting_price).unwrap();
    assert_eq!(auction.price_step, 100);
}

#[test]
fn test_auction_can_be_created_without_bidders() {
    let auction = new_auction_with(|r| r.bidders.clear()).unwrap();
    assert!(auction.bidders.is_empty());
}

#[test]
fn test_start_moves_to_in_progress() {
    let mut auction = sample_auction();
    lifecycle::start(&mut auction, sample_started_at()).unwrap();

    assert_eq!(auction.status, AuctionStatus::InProgress);
    assert_eq!(auction.current_round, 1);
    assert_eq!(auction.started_at, Some(sample_started_at()));
}

#[test]
fn test_start_requires_two_bidders() {
    let mut auction = new_auction_with(|r| r.bidders.truncate(1)).unwrap();
    let before = auction.clone();

    let result = lifecycle::start(&mut auction, sample_started_at());
    assert_eq!(result.unwrap_err(), Errors::InsufficientBidders(1));
    assert_eq!(auction, before);
}

#[test]
fn test_starting_twice_is_invalid() {
    let mut auction = sample_started_auction();
    let before = auction.clone();

    let result = lifecycle::start(&mut auction, sample_bid_time());
    assert!(matches!(
        result,
        Err(Errors::InvalidState {
            status: AuctionStatus::InProgress,
            ..
        })
    ));
    assert_eq!(auction, before);
}

#[test]
fn test_end_before_start_is_invalid() {
    let mut auction = sample_auction();
    let before = auction.clone();

    let result = lifecycle::end(&mut auction, sample_bid_time());
    assert!(matches!(
        result,
        Err(Errors::InvalidState {
            status: AuctionStatus::NotStarted,
            ..
        })
    ));
    assert_eq!(auction, before);
}

#[test]
fn test_completed_is_terminal() {
    let mut auction = sample_started_auction();
    let end_time = sample_bid_time() + Duration::minutes(1);
    lifecycle::end(&mut auction, end_time).unwrap();
    assert_eq!(auction.status, AuctionStatus::Completed);
    assert_eq!(auction.ended_at, Some(end_time));

    assert!(matches!(lifecycle::start(&mut auction, end_time), Err(Errors::InvalidState { .. })));
    assert!(matches!(lifecycle::end(&mut auction, end_time), Err(Errors::InvalidState { .. })));
    assert_eq!(auction.status, AuctionStatus::Completed);
}

#[test]
fn test_add_bidder_assigns_next_numeric_id() {
    let mut auction = new_auction_with(|r| {
        r.bidders = vec![Bidder::new("7", "Seven", ""), Bidder::new("x", "Ex", "")];
    })
    .unwrap();

    let added = lifecycle::add_bidder(&mut auction, Bidder::new("", "Dave", "4 Main Street")).unwrap();
    assert_eq!(added.id, "8");
    assert_eq!(auction.bidders.len(), 3);

    let mut empty = new_auction_with(|r| r.bidders.clear()).unwrap();
    let first = lifecycle::add_bidder(&mut empty, Bidder::new("", "Erin", "")).unwrap();
    assert_eq!(first.id, "1");
}

#[test]
fn test_add_bidder_rejects_duplicates() {
    let mut auction = sample_auction();

    let result = lifecycle::add_bidder(&mut auction, Bidder::new("A", "Someone else", ""));
    assert_eq!(result.unwrap_err(), Errors::DuplicateBidder("A".to_string()));

    let result = lifecycle::add_bidder(&mut auction, Bidder::new("Z", "Bob", ""));
    assert_eq!(result.unwrap_err(), Errors::DuplicateBidder("Bob".to_string()));
    assert_eq!(auction.bidders.len(), 2);
}

#[test]
fn test_roster_is_frozen_once_started() {
    let mut auction = sample_started_auction();

    assert!(matches!(
        lifecycle::add_bidder(&mut auction, bidder_c()),
        Err(Errors::InvalidState { .. })
    ));
    assert!(matches!(
        lifecycle::remove_bidder(&mut auction, "A"),
        Err(Errors::InvalidState { .. })
    ));
    assert!(matches!(
        lifecycle::set_bidders(&mut auction, vec![bidder_c()]),
        Err(Errors::InvalidState { .. })
    ));
    assert_eq!(auction.bidders, vec![bidder_a(), bidder_b()]);
}

#[test]
fn test_remove_bidder() {
    let mut auction = sample_auction();

    let removed = lifecycle::remove_bidder(&mut auction, "A").unwrap();
    assert_eq!(removed, bidder_a());
    assert_eq!(auction.bidders, vec![bidder_b()]);

    let result = lifecycle::remove_bidder(&mut auction, "A");
    assert_eq!(result.unwrap_err(), Errors::BidderNotFound("A".to_string()));
}

#[test]
fn test_set_bidders_replaces_roster() {
    let mut auction = sample_auction();
    lifecycle::set_bidders(&mut auction, vec![bidder_b(), bidder_c()]).unwrap();
    assert_eq!(auction.bidders, vec![bidder_b(), bidder_c()]);

    let result = lifecycle::set_bidders(&mut auction, vec![bidder_a(), bidder_a()]);
    assert_eq!(result.unwrap_err(), Errors::DuplicateBidder("A".to_string()));
    assert_eq!(auction.bidders, vec![bidder_b(), bidder_c()]);
}

#[test]
fn test_snapshot_requires_completed_auction() {
    let auction = sample_started_auction();
    let result = auction.snapshot(sample_bid_time());
    assert!(matches!(
        result,
        Err(Errors::InvalidState {
            status: AuctionStatus::InProgress,
            ..
        })
    ));
}
