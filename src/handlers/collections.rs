use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Json, Response};
use serde::Serialize;
use serde_json::Value;

use crate::error::{AppError, AppResult};
use crate::handlers::respond;
use crate::models::record::ID_FIELD;
use crate::models::Document;
use crate::state::AppState;

const MAX_NAME_LEN: usize = 64;

#[derive(Debug, Serialize)]
pub struct CollectionNames {
    pub collections: Vec<String>,
}

fn collection_name(raw: &str) -> AppResult<&str> {
    let valid = !raw.is_empty()
        && raw.len() <= MAX_NAME_LEN
        && raw
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');

    if valid {
        Ok(raw)
    } else {
        Err(AppError::Validation(format!(
            "Invalid collection name '{}': use 1-{} letters, digits, '_' or '-'",
            raw, MAX_NAME_LEN
        )))
    }
}

fn object_body(body: Value) -> AppResult<Document> {
    match body {
        Value::Object(doc) => Ok(doc),
        _ => Err(AppError::Validation(
            "Request body must be a JSON object".into(),
        )),
    }
}

pub async fn names(State(state): State<AppState>) -> Response {
    let outcome = state
        .store
        .collection_names()
        .map(|collections| CollectionNames { collections });
    respond(StatusCode::OK, outcome)
}

pub async fn list(
    State(state): State<AppState>,
    Path(collection): Path<String>,
) -> AppResult<Response> {
    let collection = collection_name(&collection)?;
    let outcome = state.store.get_all::<Document>(collection);
    Ok(respond(StatusCode::OK, outcome))
}

pub async fn create(
    State(state): State<AppState>,
    Path(collection): Path<String>,
    Json(body): Json<Value>,
) -> AppResult<Response> {
    let collection = collection_name(&collection)?;
    let doc = object_body(body)?;

    let outcome = state
        .store
        .create_document::<Document>(collection, doc)?;
    tracing::debug!(collection, id = %outcome.value().id, "Created record");
    Ok(respond(StatusCode::CREATED, outcome))
}

pub async fn show(
    State(state): State<AppState>,
    Path((collection, id)): Path<(String, String)>,
) -> AppResult<Response> {
    let collection = collection_name(&collection)?;
    let outcome = state.store.get_by_id::<Document>(collection, &id);

    if outcome.value().is_none() {
        return Err(AppError::NotFound {
            collection: collection.to_string(),
            id,
        });
    }
    Ok(respond(StatusCode::OK, outcome))
}

pub async fn update(
    State(state): State<AppState>,
    Path((collection, id)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> AppResult<Response> {
    let collection = collection_name(&collection)?;
    let mut patch = object_body(body)?;

    match patch.get(ID_FIELD) {
        None | Some(Value::Null) => {}
        Some(Value::String(body_id)) if *body_id == id => {}
        Some(_) => {
            return Err(AppError::Validation(format!(
                "{} in body does not match the URL",
                ID_FIELD
            )))
        }
    }
    patch.insert(ID_FIELD.into(), Value::String(id));

    let outcome = state
        .store
        .update::<Document, _>(collection, &patch)?;
    Ok(respond(StatusCode::OK, outcome))
}

pub async fn delete(
    State(state): State<AppState>,
    Path((collection, id)): Path<(String, String)>,
) -> AppResult<Response> {
    let collection = collection_name(&collection)?;
    let outcome = state.store.delete::<Document>(collection, &id)?;
    tracing::debug!(collection, id = %id, "Deleted record");
    Ok(respond(StatusCode::OK, outcome))
}
