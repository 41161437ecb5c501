//! REST API endpoint for removing artworks.
//!
//! Artwork management lives outside this service; removal is exposed here
//! because it has to take the artwork's auction along with it.

use crate::{ApiApplication, authenticate, error::ApiError, is_admin, views::ArtworkIdOf};
use acp_core::{
    config::AuctionConfig,
    lifecycle::AuctionManager,
    ports::{Application, ArtworkRepository as _},
};
use aide::axum::{ApiRouter, routing::delete};
use axum::{
    Extension,
    extract::{Path, State},
    http::StatusCode,
};
use axum_extra::{TypedHeader, extract::WithRejection};
use headers::{Authorization, authorization::Bearer};
use std::sync::Arc;
use tracing::{Level, event};

/// Path parameter for artwork-specific endpoints.
#[derive(serde::Deserialize, schemars::JsonSchema)]
struct Id<T> {
    /// The unique identifier of the artwork
    artwork_id: T,
}

/// Creates a router with artwork-related endpoints.
pub fn router<T: ApiApplication>() -> ApiRouter<T> {
    ApiRouter::new().api_route_with("/{artwork_id}", delete(remove_artwork::<T>), |route| {
        route.security_requirement("jwt").tag("artworks")
    })
}

/// Delete an artwork together with its auction.
///
/// # Authorization
///
/// The artwork's artist, or an admin.
///
/// # Returns
///
/// - `204 No Content`: The artwork and its auction are gone
/// - `400 Bad Request`: Malformed artwork id
/// - `401 Unauthorized`: Token not accepted
/// - `403 Forbidden`: Caller is neither the artist nor an admin
/// - `404 Not Found`: Caller or artwork does not exist
/// - `500 Internal Server Error`: Database operation failed
async fn remove_artwork<T: ApiApplication>(
    State(app): State<T>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(auction_config): Extension<Arc<AuctionConfig>>,
    WithRejection(Path(Id { artwork_id }), _): WithRejection<
        Path<Id<ArtworkIdOf<T>>>,
        ApiError,
    >,
) -> Result<StatusCode, ApiError> {
    let user = authenticate(&app, &auth).await?;
    let db = app.database();

    let artwork = db
        .get_artwork(artwork_id.clone())
        .await
        .map_err(|err| ApiError::internal(err, format!("failed to get artwork {artwork_id}")))?
        .ok_or_else(|| ApiError::not_found(format!("unknown artwork {artwork_id}")))?;

    if artwork.artist_id != user.id && !is_admin(&app, &auth, &user).await {
        return Err(ApiError::forbidden("only the artist can remove this artwork"));
    }

    AuctionManager::new(db, &auction_config)
        .remove_artwork(artwork_id.clone(), app.now())
        .await?;
    event!(
        Level::INFO,
        artwork_id = artwork_id.to_string(),
        "artwork removed"
    );

    Ok(StatusCode::NO_CONTENT)
}
