// src/domain/bids.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use super::core::{AmountValue, BidderId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bidder {
    pub id: BidderId,
    pub name: String,
    #[serde(default)]
    pub address: String,
}

impl Bidder {
    pub fn new(id: impl Into<BidderId>, name: impl Into<String>, address: impl Into<String>) -> Self {
        Bidder {
            id: id.into(),
            name: name.into(),
            address: address.into(),
        }
    }
}

/// A recorded bid. `round` is the auction's round counter at the moment the
/// bid was accepted and is kept for the audit trail only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bid {
    pub round: u32,
    pub bidder_id: BidderId,
    pub bidder_name: String,
    pub amount: AmountValue,
    pub timestamp: DateTime<Utc>,
}
