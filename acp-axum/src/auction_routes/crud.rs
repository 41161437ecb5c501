use super::{Id, whole_units};
use crate::{
    ApiApplication, authenticate,
    error::ApiError,
    views::{self, ArtworkIdOf, AuctionIdOf, AuctionView, AuctionViewOf, DateTimeOf, DetailOf},
};
use acp_core::{
    config::AuctionConfig,
    lifecycle::{AuctionFailure, AuctionManager},
    models::UserRole,
    ports::{Application, ArtworkRepository as _},
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use axum_extra::{TypedHeader, extract::WithRejection};
use headers::{Authorization, authorization::Bearer};
use std::sync::Arc;
use tracing::{Level, event};

/// Request body for creating an auction.
///
/// Every field is optional at the type level so that a missing field is
/// reported as such rather than as a generic parse failure.
#[derive(serde::Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateAuction<ArtworkId, DateTime> {
    /// The artwork to put up for auction
    artwork_id: Option<ArtworkId>,
    /// The floor bid, a positive integer
    #[schemars(with = "Option<i64>")]
    start_price: Option<serde_json::Value>,
    /// When bidding closes, in the future
    end_time: Option<DateTime>,
}

#[derive(serde::Serialize, schemars::JsonSchema)]
pub(crate) struct CreatedAuction<Auction> {
    success: bool,
    auction: Auction,
}

/// Retrieve an auction with its artwork, artist, artform and bid history.
///
/// # Returns
///
/// - `200 OK`: The auction's page
/// - `400 Bad Request`: Malformed auction id
/// - `404 Not Found`: Auction does not exist
/// - `500 Internal Server Error`: Database query failed
pub(crate) async fn read_auction<T: ApiApplication>(
    State(app): State<T>,
    Extension(auction_config): Extension<Arc<AuctionConfig>>,
    WithRejection(Path(Id { auction_id }), _): WithRejection<
        Path<Id<AuctionIdOf<T>>>,
        ApiError,
    >,
) -> Result<Json<DetailOf<T>>, ApiError> {
    let manager = AuctionManager::new(app.database(), &auction_config);
    let auction = manager.get_auction(auction_id).await?;

    Ok(Json(views::detail(&app, auction, &app.now()).await?))
}

/// Put an artwork up for auction.
///
/// # Authorization
///
/// The caller must be a registered artist and own the artwork.
///
/// # Returns
///
/// - `201 Created`: The new auction
/// - `400 Bad Request`: Malformed request, missing field, non-integer or non-positive start price, or end time not in the future
/// - `401 Unauthorized`: Token not accepted
/// - `403 Forbidden`: Caller is not an artist, or not the artwork's artist
/// - `404 Not Found`: Caller or artwork does not exist
/// - `409 Conflict`: The artwork already has an open auction
/// - `500 Internal Server Error`: Database operation failed
pub(crate) async fn create_auction<T: ApiApplication>(
    State(app): State<T>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(auction_config): Extension<Arc<AuctionConfig>>,
    WithRejection(Json(body), _): WithRejection<
        Json<CreateAuction<ArtworkIdOf<T>, DateTimeOf<T>>>,
        ApiError,
    >,
) -> Result<(StatusCode, Json<CreatedAuction<AuctionViewOf<T>>>), ApiError> {
    let user = authenticate(&app, &auth).await?;

    let artwork_id = body
        .artwork_id
        .ok_or_else(|| ApiError::missing_field("artworkId"))?;
    let start_price = body
        .start_price
        .ok_or_else(|| ApiError::missing_field("startPrice"))?;
    let start_price = whole_units(start_price, AuctionFailure::InvalidStartPrice)?;
    let end_time = body
        .end_time
        .ok_or_else(|| ApiError::missing_field("endTime"))?;

    if user.data.role != UserRole::Artist {
        return Err(ApiError::forbidden("only artists can create auctions"));
    }

    let db = app.database();
    let artwork = db
        .get_artwork(artwork_id.clone())
        .await
        .map_err(|err| ApiError::internal(err, format!("failed to get artwork {artwork_id}")))?
        .ok_or_else(|| ApiError::not_found(format!("unknown artwork {artwork_id}")))?;

    if artwork.artist_id != user.id {
        return Err(ApiError::forbidden(
            "you can only create auctions for your own artworks",
        ));
    }

    let as_of = app.now();
    let auction = AuctionManager::new(db, &auction_config)
        .create_auction(
            app.generate_auction_id(),
            artwork_id,
            user.id,
            start_price,
            end_time,
            as_of.clone(),
        )
        .await?;

    event!(
        Level::INFO,
        auction_id = auction.id.to_string(),
        artwork_id = auction.artwork_id.to_string(),
        "auction created"
    );

    Ok((
        StatusCode::CREATED,
        Json(CreatedAuction {
            success: true,
            auction: AuctionView::new(auction, &as_of),
        }),
    ))
}
