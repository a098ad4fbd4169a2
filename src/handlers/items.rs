//! Item handlers: create, list, read, update, delete.

use crate::error::AppError;
use crate::model::{ItemPatch, NewItem};
use crate::response;
use crate::service::{ItemService, Pagination};
use crate::sql::ItemFilter;
use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;

fn parse_id(id_str: &str) -> Result<i64, AppError> {
    id_str
        .trim()
        .parse()
        .map_err(|_| AppError::Validation("invalid item id".into()))
}

/// Decode a JSON object body into the payload type whatever the declared
/// content type. Bodies over the configured limit are rejected with 413;
/// anything else unreadable is a validation error.
fn decode_body<T: DeserializeOwned>(body: Result<Bytes, BytesRejection>) -> Result<T, AppError> {
    let bytes = body.map_err(|e| match e.status() {
        StatusCode::PAYLOAD_TOO_LARGE => AppError::PayloadTooLarge(e.body_text()),
        _ => AppError::Validation(e.body_text()),
    })?;
    let value: Value = serde_json::from_slice(&bytes).map_err(|e| AppError::Validation(e.to_string()))?;
    if !value.is_object() {
        return Err(AppError::Validation("body must be a JSON object".into()));
    }
    serde_json::from_value(value).map_err(|e| AppError::Validation(e.to_string()))
}

pub async fn create(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<impl IntoResponse, AppError> {
    let body: NewItem = decode_body(body)?;
    let item = ItemService::create(state.store.as_ref(), body).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    let filter = ItemFilter::from_query(&params);
    let pagination = Pagination::from_query(&params);
    let page = ItemService::list(state.store.as_ref(), &filter, pagination).await?;
    Ok((StatusCode::OK, Json(page)))
}

pub async fn read(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let item = ItemService::read(state.store.as_ref(), id).await?;
    Ok((StatusCode::OK, Json(item)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
    body: Result<Bytes, BytesRejection>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let patch: ItemPatch = decode_body(body)?;
    let id = ItemService::update(state.store.as_ref(), id, patch).await?;
    Ok((StatusCode::OK, Json(response::updated(id))))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    ItemService::delete(state.store.as_ref(), id).await?;
    Ok((StatusCode::OK, Json(response::deleted())))
}
