//! REST API endpoints for auctions.
//!
//! Reads are public. Creating an auction requires the artist role and
//! ownership of the artwork, bidding requires a registered user, and closing
//! an auction requires its artist or an admin.

use crate::{ApiApplication, error::ApiError};
use acp_core::lifecycle::AuctionFailure;
use aide::{
    axum::{
        ApiRouter,
        routing::{get_with, post_with},
    },
    transform::TransformOperation,
};
use std::convert::Infallible;

mod bid;
mod crud;
mod lifecycle;
mod list;

/// Path parameter for auction-specific endpoints.
#[derive(serde::Deserialize, schemars::JsonSchema)]
struct Id<T> {
    /// The unique identifier of the auction
    auction_id: T,
}

/// Read a whole number of currency units from a request field, refusing
/// fractions, strings and every other non-integer with `invalid`.
fn whole_units(
    value: serde_json::Value,
    invalid: AuctionFailure<Infallible>,
) -> Result<i64, ApiError> {
    value.as_i64().ok_or_else(|| ApiError::from(invalid))
}

fn public(op: TransformOperation) -> TransformOperation {
    op.tag("auctions")
}

fn authenticated(op: TransformOperation) -> TransformOperation {
    op.security_requirement("jwt").tag("bidding")
}

fn admin(op: TransformOperation) -> TransformOperation {
    op.security_requirement("jwt").tag("admin")
}

/// Creates a router with auction-related endpoints.
pub fn router<T: ApiApplication>() -> ApiRouter<T> {
    ApiRouter::new()
        .api_route(
            "/",
            get_with(list::list_auctions::<T>, public)
                .post_with(crud::create_auction::<T>, authenticated),
        )
        .api_route(
            "/ending-soon",
            get_with(list::list_ending_soon::<T>, public),
        )
        .api_route("/sweep", post_with(lifecycle::sweep::<T>, admin))
        .api_route(
            "/{auction_id}",
            get_with(crud::read_auction::<T>, public),
        )
        .api_route(
            "/{auction_id}/bid",
            post_with(bid::place_bid::<T>, authenticated),
        )
        .api_route(
            "/{auction_id}/end",
            post_with(lifecycle::end_auction::<T>, authenticated),
        )
}
