// src/domain/admission.rs
use chrono::{DateTime, Utc};
use super::auctions::Auction;
use super::bids::Bid;
use super::core::{AmountValue, AuctionStatus, Errors};

/// Minimum time between two bids recorded for the same bidder.
pub const THROTTLE_WINDOW_MILLIS: i64 = 2_000;

/// Decides whether `amount` from `bidder_id` can be recorded on `auction` at `now`.
///
/// Checks run in a fixed order and the first failure wins:
/// amount, status, bidder registration, duplicate submission, throttle, minimum bid.
/// On success the new bid is returned together with an updated copy of the
/// auction; the input is never touched.
pub fn admit(
    auction: &Auction,
    bidder_id: &str,
    amount: AmountValue,
    now: DateTime<Utc>,
) -> Result<(Bid, Auction), Errors> {
    if amount <= 0 {
        return Err(Errors::InvalidAmount(amount));
    }

    if auction.status != AuctionStatus::InProgress {
        return Err(Errors::NotInProgress(auction.status));
    }

    let bidder = auction
        .find_bidder(bidder_id)
        .ok_or_else(|| Errors::UnknownBidder(bidder_id.to_string()))?;

    // Operator double-submission: an identical (bidder, amount) pair is never accepted twice.
    if auction
        .bid_history
        .iter()
        .any(|bid| bid.bidder_id == bidder_id && bid.amount == amount)
    {
        return Err(Errors::DuplicateBid {
            bidder_id: bidder_id.to_string(),
            amount,
        });
    }

    // Only the bidder's latest bid counts towards the window.
    if let Some(last) = auction.last_bid_by(bidder_id) {
        let elapsed = (now - last.timestamp).num_milliseconds().max(0);
        if elapsed < THROTTLE_WINDOW_MILLIS {
            return Err(Errors::Throttled {
                wait_millis: THROTTLE_WINDOW_MILLIS - elapsed,
            });
        }
    }

    let min_required = auction.min_required_bid();
    if amount < min_required {
        return Err(Errors::BidTooLow { min_required });
    }

    let bid = Bid {
        round: auction.current_round,
        bidder_id: bidder.id.clone(),
        bidder_name: bidder.name.clone(),
        amount,
        timestamp: now,
    };

    let mut updated = auction.clone();
    updated.bid_history.push(bid.clone());
    updated.highest_bid = amount;
    updated.highest_bidder = bid.bidder_id.clone();
    if updated.current_round > 0 {
        updated.current_round = updated.current_round.saturating_add(1);
    }

    Ok((bid, updated))
}
