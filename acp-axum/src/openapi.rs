//! OpenAPI documentation generation and serving.

use std::sync::Arc;

use aide::{
    axum::{ApiRouter, IntoApiResponse, routing::get},
    openapi::{OpenApi, SecurityScheme, Tag},
    transform::TransformOpenApi,
};
use axum::{
    Extension, Json,
    response::{Html, IntoResponse},
};

/// Serve the RapiDoc interactive API documentation interface.
async fn serve_rapidoc() -> impl IntoApiResponse {
    let html = r#"<!doctype html>
<html>
  <head>
    <meta charset="utf-8">
    <script src="https://cdnjs.cloudflare.com/ajax/libs/rapidoc/9.3.8/rapidoc-min.js" integrity="sha512-0ES6eX4K9J1PrIEjIizv79dTlN5HwI2GW9Ku6ymb8dijMHF5CIplkS8N0iFJ/wl3GybCSqBJu8HDhiFkZRAf0g==" crossorigin="anonymous" referrerpolicy="no-referrer"></script>
  </head>
  <body>
    <rapi-doc spec-url="/docs/api.json"
        show-method-in-nav-bar="as-colored-text"
        use-path-in-nav-bar="true"
    ></rapi-doc>
  </body>
</html>"#;
    Html(html).into_response()
}

/// Creates a router for documentation endpoints.
pub(crate) fn docs_routes() -> ApiRouter {
    ApiRouter::new()
        .route("/", get(serve_rapidoc))
        .route("/api.json", get(serve_docs))
}

/// Serve the raw OpenAPI specification.
async fn serve_docs(Extension(api): Extension<Arc<OpenApi>>) -> impl IntoApiResponse {
    Json(api).into_response()
}

/// Configure the OpenAPI documentation metadata.
pub(crate) fn api_docs(api: TransformOpenApi) -> TransformOpenApi {
    api.title("Art & Culture Platform Auctions API")
        .summary("Time-bounded auctions of artworks with strictly increasing bids.")
        .description("This API lists auctions, lets artists put their artworks up for auction, and lets registered users bid on them.")
        .version("0.1")
        .security_scheme("jwt", SecurityScheme::Http { scheme: "bearer".into(), bearer_format: Some("JWT".into()), description: None, extensions: Default::default() })
        .tag(Tag {
            name: "auctions".into(),
            description: Some("Listing and inspecting auctions".into()),
            ..Default::default()
        })
        .tag(Tag {
            name: "bidding".into(),
            description: Some("Creating auctions and placing bids".into()),
            ..Default::default()
        })
        .tag(Tag {
            name: "artworks".into(),
            description: Some("Artwork removal, cascading to its auction".into()),
            ..Default::default()
        })
        .tag(Tag {
            name: "admin".into(),
            description: Some("Operations requiring `admin: true` claim in JWT".into()),
            ..Default::default()
        })
}
