pub mod advisor;
pub mod collections;
pub mod summary;

use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::Router;
use serde::Serialize;

use crate::outcome::Outcome;
use crate::state::AppState;

/// Set on responses whose content is a fallback; the value is the reason kind.
pub const DEGRADED_HEADER: &str = "x-mintai-degraded";

pub fn routes() -> Router<AppState> {
    Router::new()
        // Advisor
        .route("/api/insights", post(advisor::insights))
        .route("/api/advice", post(advisor::advice))
        // Collection store
        .route("/api/collections", get(collections::names))
        .route(
            "/api/collections/:collection",
            get(collections::list).post(collections::create),
        )
        .route(
            "/api/collections/:collection/:id",
            get(collections::show)
                .put(collections::update)
                .delete(collections::delete),
        )
        // Derived views
        .route("/api/summary", get(summary::show))
        // Health check
        .route("/health", get(advisor::health))
}

/// JSON response for an outcome, flagging degraded content in a header.
pub fn respond<T: Serialize>(status: StatusCode, outcome: Outcome<T>) -> Response {
    let (value, reason) = outcome.into_parts();
    let mut response = (status, Json(value)).into_response();
    if let Some(reason) = reason {
        response
            .headers_mut()
            .insert(DEGRADED_HEADER, HeaderValue::from_static(reason.kind()));
    }
    response
}
