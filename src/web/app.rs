use actix_web::{web, HttpResponse, Result};
use chrono::Utc;
use log::{error, info, warn};
use serde_json::json;
use std::sync::Arc;

use crate::config::{Config, StorageBackend};
use crate::domain::{export_snapshot, handle, validate_roster, AuctionId, Bidder, BidderId, Command, Errors};
use crate::persistence::{JsonFileStore, MemoryStore, Repository};
use super::types::{
    ApiError, AppState, AuctionItem, BidHistory, BidderRequest, CreateAuctionRequest, CurrentBids,
    ImportAccepted, PlaceBidRequest, SetBiddersRequest,
};

pub fn init_app_state(config: &Config) -> Result<AppState, Errors> {
    let repository = match config.storage {
        StorageBackend::JsonFile => Repository::new(JsonFileStore::open(&config.data_dir, &config.data_file)?),
        StorageBackend::Memory => {
            warn!("Using in-memory storage, auctions will not survive a restart");
            Repository::new(MemoryStore::new())
        }
    };

    Ok(AppState {
        repository: Arc::new(repository),
        import_timeout: config.import_timeout,
    })
}

async fn heartbeat() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "timestamp": Utc::now(),
    }))
}

async fn get_auctions(data: web::Data<AppState>) -> Result<HttpResponse, Errors> {
    let auctions: Vec<AuctionItem> = data
        .repository
        .list_auctions()?
        .iter()
        .map(AuctionItem::from)
        .collect();

    Ok(HttpResponse::Ok().json(auctions))
}

async fn get_auction(path: web::Path<AuctionId>, data: web::Data<AppState>) -> Result<HttpResponse, Errors> {
    let auction = data.repository.get_auction(&path.into_inner())?;
    Ok(HttpResponse::Ok().json(auction))
}

async fn create_auction(
    auction_req: web::Json<CreateAuctionRequest>,
    data: web::Data<AppState>,
) -> Result<HttpResponse, Errors> {
    let command = Command::CreateAuction {
        timestamp: Utc::now(),
        auction: auction_req.into_inner().into_new_auction(),
    };
    let success = handle(command, &data.repository)?;
    Ok(HttpResponse::Created().json(success))
}

async fn delete_auction(path: web::Path<AuctionId>, data: web::Data<AppState>) -> Result<HttpResponse, Errors> {
    let command = Command::DeleteAuction {
        auction_id: path.into_inner(),
    };
    Ok(HttpResponse::Ok().json(handle(command, &data.repository)?))
}

async fn start_auction(path: web::Path<AuctionId>, data: web::Data<AppState>) -> Result<HttpResponse, Errors> {
    let command = Command::StartAuction {
        timestamp: Utc::now(),
        auction_id: path.into_inner(),
    };
    Ok(HttpResponse::Ok().json(handle(command, &data.repository)?))
}

async fn end_auction(path: web::Path<AuctionId>, data: web::Data<AppState>) -> Result<HttpResponse, Errors> {
    let command = Command::EndAuction {
        timestamp: Utc::now(),
        auction_id: path.into_inner(),
    };
    Ok(HttpResponse::Ok().json(handle(command, &data.repository)?))
}

async fn place_bid(
    path: web::Path<AuctionId>,
    bid_req: web::Json<PlaceBidRequest>,
    data: web::Data<AppState>,
) -> Result<HttpResponse, Errors> {
    let bid_req = bid_req.into_inner();
    let command = Command::PlaceBid {
        timestamp: Utc::now(),
        auction_id: path.into_inner(),
        bidder_id: bid_req.bidder_id,
        amount: bid_req.amount,
    };
    Ok(HttpResponse::Ok().json(handle(command, &data.repository)?))
}

async fn get_current_bids(path: web::Path<AuctionId>, data: web::Data<AppState>) -> Result<HttpResponse, Errors> {
    let auction = data.repository.get_auction(&path.into_inner())?;
    Ok(HttpResponse::Ok().json(CurrentBids::from(&auction)))
}

async fn get_bid_history(path: web::Path<AuctionId>, data: web::Data<AppState>) -> Result<HttpResponse, Errors> {
    let auction = data.repository.get_auction(&path.into_inner())?;
    Ok(HttpResponse::Ok().json(BidHistory {
        total_bids: auction.bid_history.len(),
        auction_id: auction.id,
        bid_history: auction.bid_history,
    }))
}

async fn export_auction(path: web::Path<AuctionId>, data: web::Data<AppState>) -> Result<HttpResponse, Errors> {
    let snapshot = export_snapshot(&data.repository, &path.into_inner(), Utc::now())?;
    Ok(HttpResponse::Ok().json(snapshot))
}

async fn get_bidders(path: web::Path<AuctionId>, data: web::Data<AppState>) -> Result<HttpResponse, Errors> {
    let auction = data.repository.get_auction(&path.into_inner())?;
    Ok(HttpResponse::Ok().json(auction.bidders))
}

async fn set_bidders(
    path: web::Path<AuctionId>,
    req: web::Json<SetBiddersRequest>,
    data: web::Data<AppState>,
) -> Result<HttpResponse, Errors> {
    let command = Command::SetBidders {
        auction_id: path.into_inner(),
        bidders: req.into_inner().bidders.into_iter().map(Bidder::from).collect(),
    };
    Ok(HttpResponse::Ok().json(handle(command, &data.repository)?))
}

async fn add_bidder(
    path: web::Path<AuctionId>,
    req: web::Json<BidderRequest>,
    data: web::Data<AppState>,
) -> Result<HttpResponse, Errors> {
    let command = Command::AddBidder {
        auction_id: path.into_inner(),
        bidder: Bidder::from(req.into_inner()),
    };
    Ok(HttpResponse::Created().json(handle(command, &data.repository)?))
}

async fn delete_bidder(
    path: web::Path<(AuctionId, BidderId)>,
    data: web::Data<AppState>,
) -> Result<HttpResponse, Errors> {
    let (auction_id, bidder_id) = path.into_inner();
    let command = Command::RemoveBidder { auction_id, bidder_id };
    Ok(HttpResponse::Ok().json(handle(command, &data.repository)?))
}

// The roster is applied in the background; the caller only learns whether it was well-formed.
async fn import_bidders(
    path: web::Path<AuctionId>,
    req: web::Json<SetBiddersRequest>,
    data: web::Data<AppState>,
) -> Result<HttpResponse, Errors> {
    let auction_id = path.into_inner();
    let bidders: Vec<Bidder> = req.into_inner().bidders.into_iter().map(Bidder::from).collect();
    if bidders.is_empty() {
        return Err(Errors::Validation("No bidders found in roster".to_string()));
    }
    validate_roster(&bidders)?;
    data.repository.get_auction(&auction_id)?;

    let count = bidders.len();
    let repository = data.repository.clone();
    let deadline = data.import_timeout;
    let id = auction_id.clone();

    actix_web::rt::spawn(async move {
        let work = web::block(move || handle(Command::SetBidders { auction_id: id, bidders }, &repository));
        match tokio::time::timeout(deadline, work).await {
            Ok(Ok(Ok(_))) => info!("Imported {} bidders into auction {}", count, auction_id),
            Ok(Ok(Err(err))) => warn!("Roster import for auction {} rejected: {}", auction_id, err),
            Ok(Err(err)) => error!("Roster import for auction {} failed to run: {}", auction_id, err),
            Err(_) => warn!("Roster import for auction {} timed out after {:?}", auction_id, deadline),
        }
    });

    Ok(HttpResponse::Accepted().json(ImportAccepted {
        message: "Roster accepted for import".to_string(),
        count,
    }))
}

fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let body = ApiError {
            error: "VALIDATION_ERROR".to_string(),
            message: err.to_string(),
            time_to_wait: None,
            minimum_bid: None,
        };
        actix_web::error::InternalError::from_response(err, HttpResponse::BadRequest().json(body)).into()
    })
}

// Configure routes
pub fn configure_app(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .route("/health", web::get().to(heartbeat))
        .service(
            web::scope("/api/v1")
                .route("/auctions", web::get().to(get_auctions))
                .route("/auctions", web::post().to(create_auction))
                .route("/auctions/{id}", web::get().to(get_auction))
                .route("/auctions/{id}", web::delete().to(delete_auction))
                .route("/auctions/{id}/start", web::put().to(start_auction))
                .route("/auctions/{id}/end", web::put().to(end_auction))
                .route("/auctions/{id}/export", web::get().to(export_auction))
                .route("/auctions/{id}/bids", web::post().to(place_bid))
                .route("/auctions/{id}/bids/current", web::get().to(get_current_bids))
                .route("/auctions/{id}/bids/history", web::get().to(get_bid_history))
                .route("/auctions/{id}/bidders", web::get().to(get_bidders))
                .route("/auctions/{id}/bidders", web::put().to(set_bidders))
                .route("/auctions/{id}/bidders", web::post().to(add_bidder))
                .route("/auctions/{id}/bidders/import", web::post().to(import_bidders))
                .route("/auctions/{id}/bidders/{bidder_id}", web::delete().to(delete_bidder)),
        );
}
