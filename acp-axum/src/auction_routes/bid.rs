use super::{Id, whole_units};
use crate::{
    ApiApplication, authenticate,
    error::ApiError,
    views::{AuctionIdOf, UserIdOf},
};
use acp_core::{
    config::AuctionConfig,
    lifecycle::{AuctionFailure, AuctionManager},
    ports::Application,
};
use axum::{
    Extension, Json,
    extract::{Path, State},
};
use axum_extra::{TypedHeader, extract::WithRejection};
use headers::{Authorization, authorization::Bearer};
use std::sync::Arc;
use tracing::{Level, event};

/// Request body for placing a bid.
#[derive(serde::Deserialize, schemars::JsonSchema)]
pub(crate) struct PlaceBid {
    /// The offered amount, a whole number strictly above the current bid
    #[schemars(with = "Option<i64>")]
    amount: Option<serde_json::Value>,
}

#[derive(serde::Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BidAccepted<UserId> {
    success: bool,
    current_bid: i64,
    current_bidder: Option<UserId>,
    message: String,
}

/// Place a bid on an auction.
///
/// A bid that lost a race against a concurrent bid is re-validated against
/// the fresh state before it is refused.
///
/// # Authorization
///
/// Any registered user may bid.
///
/// # Returns
///
/// - `200 OK`: The bid was accepted
/// - `400 Bad Request`: Malformed request, missing or non-integer or non-positive amount, amount not above the current bid, or auction ended
/// - `401 Unauthorized`: Token not accepted
/// - `404 Not Found`: Caller or auction does not exist
/// - `409 Conflict`: Concurrent bids kept winning; re-read the auction and retry
/// - `500 Internal Server Error`: Database operation failed
pub(crate) async fn place_bid<T: ApiApplication>(
    State(app): State<T>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(auction_config): Extension<Arc<AuctionConfig>>,
    WithRejection(Path(Id { auction_id }), _): WithRejection<
        Path<Id<AuctionIdOf<T>>>,
        ApiError,
    >,
    WithRejection(Json(body), _): WithRejection<Json<PlaceBid>, ApiError>,
) -> Result<Json<BidAccepted<UserIdOf<T>>>, ApiError> {
    let user = authenticate(&app, &auth).await?;
    let amount = body.amount.ok_or_else(|| ApiError::missing_field("amount"))?;
    let amount = whole_units(amount, AuctionFailure::InvalidAmount)?;

    let auction = AuctionManager::new(app.database(), &auction_config)
        .place_bid(auction_id, user.id, amount, || app.now())
        .await?;

    event!(
        Level::DEBUG,
        auction_id = auction.id.to_string(),
        amount,
        "bid accepted"
    );

    Ok(Json(BidAccepted {
        success: true,
        current_bid: auction.current_bid,
        current_bidder: auction.current_bidder,
        message: "Bid placed successfully".to_string(),
    }))
}
