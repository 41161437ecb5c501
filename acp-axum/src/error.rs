//! The error type returned by every handler.

use acp_core::lifecycle::AuctionFailure;
use aide::{
    OperationOutput,
    generate::GenContext,
    openapi::{Operation, Response},
};
use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response as AxumResponse},
};
use std::fmt::Display;
use tracing::{Level, event};

/// The JSON body of every failed request.
#[derive(serde::Serialize, schemars::JsonSchema)]
pub struct ErrorBody {
    /// A stable, machine-readable kind, e.g. `bid_too_low`
    pub error: &'static str,
    /// A human-readable description
    pub message: String,
}

/// A failed request: an HTTP status plus an [`ErrorBody`].
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    kind: &'static str,
    message: String,
}

impl ApiError {
    pub(crate) fn new(status: StatusCode, kind: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            kind,
            message: message.into(),
        }
    }

    pub(crate) fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "unauthorized", "not authorized")
    }

    pub(crate) fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, "forbidden", message)
    }

    pub(crate) fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "not_found", message)
    }

    pub(crate) fn missing_field(field: &str) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            "missing_field",
            format!("missing required field: {field}"),
        )
    }

    /// Log a storage failure and hide its details from the client.
    pub(crate) fn internal(err: impl Display, message: impl Into<String>) -> Self {
        event!(Level::ERROR, err = err.to_string());
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal", message)
    }
}

impl<E: Display> From<AuctionFailure<E>> for ApiError {
    fn from(value: AuctionFailure<E>) -> Self {
        let message = value.to_string();
        match value {
            AuctionFailure::NotFound | AuctionFailure::ArtworkNotFound => {
                Self::not_found(message)
            }
            AuctionFailure::AuctionClosed => {
                Self::new(StatusCode::BAD_REQUEST, "auction_closed", message)
            }
            AuctionFailure::InvalidAmount => {
                Self::new(StatusCode::BAD_REQUEST, "invalid_amount", message)
            }
            AuctionFailure::BidTooLow { .. } => {
                Self::new(StatusCode::BAD_REQUEST, "bid_too_low", message)
            }
            AuctionFailure::InvalidStartPrice => {
                Self::new(StatusCode::BAD_REQUEST, "invalid_start_price", message)
            }
            AuctionFailure::InvalidEndTime => {
                Self::new(StatusCode::BAD_REQUEST, "invalid_end_time", message)
            }
            AuctionFailure::AlreadyInAuction => {
                Self::new(StatusCode::CONFLICT, "already_in_auction", message)
            }
            AuctionFailure::ConcurrentBidConflict => {
                Self::new(StatusCode::CONFLICT, "concurrent_bid_conflict", message)
            }
            AuctionFailure::Repository(err) => Self::internal(err, "storage failure"),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(value: JsonRejection) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "invalid_request", value.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(value: PathRejection) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "invalid_request", value.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> AxumResponse {
        let body = ErrorBody {
            error: self.kind,
            message: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

impl OperationOutput for ApiError {
    type Inner = ErrorBody;

    fn operation_response(ctx: &mut GenContext, operation: &mut Operation) -> Option<Response> {
        <Json<ErrorBody> as OperationOutput>::operation_response(ctx, operation)
    }
}
