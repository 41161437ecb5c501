use crate::{
    ApiApplication,
    config::AxumConfig,
    error::ApiError,
    views::{self, AuctionPage, ListingOf, UserIdOf},
};
use acp_core::{config::AuctionConfig, lifecycle::AuctionManager, ports::Application};
use axum::{
    Extension, Json,
    extract::{Query, State},
};
use std::{sync::Arc, time::Duration};

const DEFAULT_PAGE: usize = 20;

#[derive(serde::Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "lowercase")]
pub(crate) enum StatusFilter {
    Ongoing,
    Ended,
}

/// Query parameters for listing auctions.
#[derive(serde::Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ListQuery<UserId> {
    /// `ongoing` (the default) or `ended`
    status: Option<StatusFilter>,
    /// Restrict to one artist's auctions, of any status
    artist_id: Option<UserId>,
    /// Page size, capped by the server's page limit
    limit: Option<usize>,
    /// How many auctions to skip
    skip: Option<usize>,
}

/// Query parameters for the ending-soon listing.
#[derive(serde::Deserialize, schemars::JsonSchema)]
pub(crate) struct EndingSoonQuery {
    /// The look-ahead window in hours
    hours: Option<u64>,
    /// Page size, capped by the server's page limit
    limit: Option<usize>,
}

async fn enrich<T: ApiApplication>(
    app: &T,
    auctions: Vec<acp_core::ports::AuctionOf<T::Repository>>,
    limit: usize,
) -> Result<AuctionPage<ListingOf<T>>, ApiError> {
    let as_of = app.now();
    let has_more = auctions.len() == limit;

    let mut listings = Vec::with_capacity(auctions.len());
    for auction in auctions {
        listings.push(views::listing(app, auction, &as_of).await?);
    }

    Ok(AuctionPage {
        auctions: listings,
        has_more,
    })
}

/// List auctions.
///
/// An explicit `status` wins over `artistId`; without either, the ongoing
/// auctions are listed.
///
/// # Returns
///
/// - `200 OK`: A page of auctions, without their bid histories
/// - `500 Internal Server Error`: Database query failed
pub(crate) async fn list_auctions<T: ApiApplication>(
    State(app): State<T>,
    Extension(config): Extension<Arc<AxumConfig>>,
    Extension(auction_config): Extension<Arc<AuctionConfig>>,
    Query(query): Query<ListQuery<UserIdOf<T>>>,
) -> Result<Json<AuctionPage<ListingOf<T>>>, ApiError> {
    let manager = AuctionManager::new(app.database(), &auction_config);
    let limit = query.limit.unwrap_or(DEFAULT_PAGE).min(config.page_limit);
    let skip = query.skip.unwrap_or(0);

    let auctions = match (query.status, query.artist_id) {
        (Some(StatusFilter::Ended), _) => manager.get_ended_auctions(limit, skip).await?,
        (None, Some(artist_id)) => {
            manager
                .get_auctions_by_artist(artist_id, limit, skip)
                .await?
        }
        (Some(StatusFilter::Ongoing), _) | (None, None) => {
            manager
                .get_ongoing_auctions(app.now(), limit, skip)
                .await?
        }
    };

    Ok(Json(enrich(&app, auctions, limit).await?))
}

/// List ongoing auctions closing soon, soonest first.
///
/// # Returns
///
/// - `200 OK`: Auctions ending within the window
/// - `500 Internal Server Error`: Database query failed
pub(crate) async fn list_ending_soon<T: ApiApplication>(
    State(app): State<T>,
    Extension(config): Extension<Arc<AxumConfig>>,
    Extension(auction_config): Extension<Arc<AuctionConfig>>,
    Query(query): Query<EndingSoonQuery>,
) -> Result<Json<AuctionPage<ListingOf<T>>>, ApiError> {
    let manager = AuctionManager::new(app.database(), &auction_config);
    let within = query
        .hours
        .map(|hours| Duration::from_secs(hours.saturating_mul(3600)))
        .unwrap_or(auction_config.ending_soon);
    let limit = query
        .limit
        .unwrap_or(auction_config.ending_soon_limit)
        .min(config.page_limit);

    let auctions = manager
        .get_auctions_ending_soon(app.now(), within, limit)
        .await?;

    Ok(Json(enrich(&app, auctions, limit).await?))
}
