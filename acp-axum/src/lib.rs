#![warn(missing_docs)]
// Note: this overwrites the link in the README to point to the rust docs of the acp-core crate.
//! [acp_core]: https://docs.rs/acp_core/latest/acp_core/index.html
#![doc = include_str!("../README.md")]

mod artwork_routes;
mod auction_routes;
mod views;

use acp_core::{
    config::AuctionConfig,
    models::UserRole,
    ports::{Application, Repository, UserOf, UserRepository as _},
};
use aide::{
    axum::{ApiRouter, routing::get},
    openapi::OpenApi,
};
use axum::{Extension, Json};
use headers::{Authorization, authorization::Bearer};
use schemars::JsonSchema;
use serde::{Serialize, de::DeserializeOwned};
use std::{fmt::Display, sync::Arc};
use tower_http::trace::TraceLayer;

mod openapi;
use openapi::{api_docs, docs_routes};

pub mod config;
use config::AxumConfig;

pub mod error;
use error::ApiError;

/// Response for the health check endpoint
#[derive(Serialize, JsonSchema)]
#[schemars(inline)]
struct HealthResponse {
    status: String,
}

/// Simple health check endpoint
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// Construct a full API router with the given state and config, along with
/// the OpenAPI document it serves under `/docs`.
pub fn router<T: ApiApplication>(
    state: T,
    config: AxumConfig,
    auction: AuctionConfig,
) -> (axum::Router, OpenApi) {
    let mut api = OpenApi::default();
    let router = ApiRouter::new()
        .api_route("/health", get(health_check))
        .nest("/auctions", auction_routes::router())
        .nest("/artworks", artwork_routes::router())
        .nest_api_service("/docs", docs_routes())
        .finish_api_with(&mut api, api_docs)
        .layer(Extension(Arc::new(api.clone())))
        .layer(Extension(Arc::new(config)))
        .layer(Extension(Arc::new(auction)))
        .layer(TraceLayer::new_for_http())
        .with_state(state);
    (router, api)
}

/// Starts the HTTP server with the provided configuration
pub async fn start_server<T: ApiApplication>(
    config: AxumConfig,
    auction: AuctionConfig,
    app: T,
) -> Result<(), std::io::Error> {
    let listener = tokio::net::TcpListener::bind(config.bind_address).await?;

    tracing::info!("Listening for requests on {}", listener.local_addr()?);

    let (service, _) = router(app, config, auction);
    axum::serve(listener, service).await
}

/// Resolve the request's bearer token into a registered user.
///
/// No principal means the token was not accepted (`401`); a principal without
/// a matching user is reported as `404`.
pub(crate) async fn authenticate<T: ApiApplication>(
    app: &T,
    auth: &Authorization<Bearer>,
) -> Result<UserOf<T::Repository>, ApiError> {
    let subject = app.principal(auth).await.ok_or_else(ApiError::unauthorized)?;

    app.database()
        .get_user_by_subject(&subject)
        .await
        .map_err(|err| ApiError::internal(err, "failed to look up user"))?
        .ok_or_else(|| ApiError::not_found("user not found"))
}

/// A caller is an admin if their account has the admin role or their token
/// carries the admin claim.
pub(crate) async fn is_admin<T: ApiApplication>(
    app: &T,
    auth: &Authorization<Bearer>,
    user: &UserOf<T::Repository>,
) -> bool {
    user.data.role == UserRole::Admin || app.is_admin(auth).await
}

/// Axum imposes all sorts of constraints on what can pass for state. This
/// trait, coupled with a blanket implementation, specifies it all upfront and
/// in one place. If a function takes a generic `T: ApiApplication`, then
/// everything one might reasonably want to do should work.
pub trait ApiApplication:
    Clone
    + Send
    + Sync
    + 'static
    + Application<
        Context = Authorization<Bearer>,
        Repository: Clone
                        + Send
                        + Sync
                        + 'static
                        + Repository<
            DateTime: Clone + Display + Serialize + DeserializeOwned + JsonSchema + Send + Sync,
            UserId: Clone + Display + Serialize + DeserializeOwned + JsonSchema + Send + Sync,
            ArtformId: Clone + Display + Serialize + DeserializeOwned + JsonSchema + Send + Sync,
            ArtworkId: Clone + Display + Serialize + DeserializeOwned + JsonSchema + Send + Sync,
            AuctionId: Clone + Display + Serialize + DeserializeOwned + JsonSchema + Send + Sync,
        >,
    >
{
}

// this is the blanket implementation
impl<T: Clone + Send + Sync + 'static> ApiApplication for T where
    T: Application<
            Context = Authorization<Bearer>,
            Repository: Clone
                            + Send
                            + Sync
                            + 'static
                            + Repository<
                DateTime: Clone + Display + Serialize + DeserializeOwned + JsonSchema + Send + Sync,
                UserId: Clone + Display + Serialize + DeserializeOwned + JsonSchema + Send + Sync,
                ArtformId: Clone
                               + Display
                               + Serialize
                               + DeserializeOwned
                               + JsonSchema
                               + Send
                               + Sync,
                ArtworkId: Clone
                               + Display
                               + Serialize
                               + DeserializeOwned
                               + JsonSchema
                               + Send
                               + Sync,
                AuctionId: Clone
                               + Display
                               + Serialize
                               + DeserializeOwned
                               + JsonSchema
                               + Send
                               + Sync,
            >,
        >
{
}
