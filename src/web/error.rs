use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};

use crate::domain::Errors;
use super::types::ApiError;

impl ResponseError for Errors {
    fn status_code(&self) -> StatusCode {
        match self {
            Errors::UnknownAuction(_) | Errors::BidderNotFound(_) => StatusCode::NOT_FOUND,
            Errors::AuctionAlreadyExists(_) | Errors::DuplicateBidder(_) => StatusCode::CONFLICT,
            Errors::Throttled { .. } => StatusCode::TOO_MANY_REQUESTS,
            Errors::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = ApiError {
            error: self.code().to_string(),
            message: self.to_string(),
            time_to_wait: match self {
                Errors::Throttled { wait_millis } => Some(*wait_millis),
                _ => None,
            },
            minimum_bid: match self {
                Errors::BidTooLow { min_required } => Some(*min_required),
                _ => None,
            },
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}
