use super::Id;
use crate::{ApiApplication, authenticate, error::ApiError, is_admin, views::AuctionIdOf};
use acp_core::{config::AuctionConfig, lifecycle::AuctionManager, ports::Application};
use axum::{
    Extension, Json,
    extract::{Path, State},
};
use axum_extra::{TypedHeader, extract::WithRejection};
use headers::{Authorization, authorization::Bearer};
use std::sync::Arc;
use tracing::{Level, event};

#[derive(serde::Serialize, schemars::JsonSchema)]
pub(crate) struct Ended {
    success: bool,
}

#[derive(serde::Serialize, schemars::JsonSchema)]
pub(crate) struct Swept {
    /// How many auctions were moved to `completed`
    completed: u64,
}

/// Close an auction before or after its end time.
///
/// Closing an already-closed auction succeeds.
///
/// # Authorization
///
/// The auction's artist, or an admin.
///
/// # Returns
///
/// - `200 OK`: The auction is completed
/// - `400 Bad Request`: Malformed auction id
/// - `401 Unauthorized`: Token not accepted
/// - `403 Forbidden`: Caller is neither the artist nor an admin
/// - `404 Not Found`: Caller or auction does not exist
/// - `500 Internal Server Error`: Database operation failed
pub(crate) async fn end_auction<T: ApiApplication>(
    State(app): State<T>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(auction_config): Extension<Arc<AuctionConfig>>,
    WithRejection(Path(Id { auction_id }), _): WithRejection<
        Path<Id<AuctionIdOf<T>>>,
        ApiError,
    >,
) -> Result<Json<Ended>, ApiError> {
    let user = authenticate(&app, &auth).await?;
    let manager = AuctionManager::new(app.database(), &auction_config);
    let auction = manager.get_auction(auction_id.clone()).await?;

    if auction.artist_id != user.id && !is_admin(&app, &auth, &user).await {
        return Err(ApiError::forbidden("only the artist can end this auction"));
    }

    manager.end_auction(auction_id).await?;
    event!(
        Level::INFO,
        auction_id = auction.id.to_string(),
        "auction ended"
    );

    Ok(Json(Ended { success: true }))
}

/// Complete every auction whose end time has passed.
///
/// # Authorization
///
/// An admin, by role or by the `admin: true` claim in the JWT.
///
/// # Returns
///
/// - `200 OK`: How many auctions were completed
/// - `401 Unauthorized`: Token not accepted
/// - `403 Forbidden`: Caller is not an admin
/// - `404 Not Found`: Caller does not exist
/// - `500 Internal Server Error`: Database operation failed
pub(crate) async fn sweep<T: ApiApplication>(
    State(app): State<T>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(auction_config): Extension<Arc<AuctionConfig>>,
) -> Result<Json<Swept>, ApiError> {
    let user = authenticate(&app, &auth).await?;
    if !is_admin(&app, &auth, &user).await {
        return Err(ApiError::forbidden("only an admin can sweep expired auctions"));
    }

    let completed = AuctionManager::new(app.database(), &auction_config)
        .auto_end_expired_auctions(app.now())
        .await?;

    Ok(Json(Swept { completed }))
}
