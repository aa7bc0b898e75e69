use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;

use crate::handlers::respond;
use crate::models::{Transaction, TRANSACTIONS};
use crate::services::analytics;
use crate::state::AppState;

/// `GET /api/summary`: the summary of everything in `transactions`.
pub async fn show(State(state): State<AppState>) -> Response {
    let outcome = state
        .store
        .get_all::<Transaction>(TRANSACTIONS)
        .map(|result| analytics::summarize(&result.items));

    respond(StatusCode::OK, outcome)
}
