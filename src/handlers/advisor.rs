use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Json, Response};
use serde::Serialize;
use serde_json::Value;

use crate::error::{AppError, AppResult};
use crate::handlers::respond;
use crate::models::{Insight, Provider};
use crate::services::advisor::is_truthy;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct InsightsResponse {
    pub insights: Vec<Insight>,
    pub provider: Provider,
}

#[derive(Debug, Serialize)]
pub struct AdviceResponse {
    pub answer: String,
    pub provider: Provider,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub service: &'static str,
    pub provider: Provider,
}

/// `POST /api/insights` with `{summary}`.
///
/// Malformed or missing bodies are treated like a missing summary.
pub async fn insights(
    State(state): State<AppState>,
    body: Option<Json<Value>>,
) -> AppResult<Response> {
    let summary = body
        .as_ref()
        .and_then(|Json(body)| body.get("summary"))
        .filter(|s| is_truthy(s))
        .ok_or_else(|| AppError::Validation("Missing summary in request body.".into()))?;

    let outcome = state.advisor.insights(summary).await.map(|advised| InsightsResponse {
        insights: advised.value,
        provider: advised.provider,
    });

    Ok(respond(StatusCode::OK, outcome))
}

/// `POST /api/advice` with `{question, context?}`.
pub async fn advice(
    State(state): State<AppState>,
    body: Option<Json<Value>>,
) -> AppResult<Response> {
    let body = body.map(|Json(body)| body).unwrap_or(Value::Null);
    let question = body
        .get("question")
        .filter(|q| is_truthy(q))
        .map(|q| match q {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .ok_or_else(|| AppError::Validation("Missing question in request body.".into()))?;

    let outcome = state
        .advisor
        .advice(&question, body.get("context"))
        .await
        .map(|advised| AdviceResponse {
            answer: advised.value,
            provider: advised.provider,
        });

    Ok(respond(StatusCode::OK, outcome))
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        service: "ai-advisor",
        provider: state.advisor.provider(),
    })
}
