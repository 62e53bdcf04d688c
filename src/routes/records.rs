use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::{
    error::AppError,
    models::{NewRecord, StoredRecord},
    services::excel::ExtractionResult,
    AppState,
};

const MANUAL_SOURCE: &str = "manual";

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/records", get(list_records).post(add_record))
}

async fn list_records(State(state): State<Arc<AppState>>) -> Result<Json<Vec<StoredRecord>>, AppError> {
    Ok(Json(state.store.list_records()?))
}

async fn add_record(
    State(state): State<Arc<AppState>>,
    Json(record): Json<NewRecord>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let name = record.name.trim();
    if name.is_empty() {
        return Err(AppError::InvalidInput("Record name must not be empty".to_string()));
    }
    if !record.normalized_activity.is_finite() {
        return Err(AppError::InvalidInput("Activity must be a finite number".to_string()));
    }

    let id = state.store.insert_record(
        MANUAL_SOURCE,
        &ExtractionResult {
            name: name.to_string(),
            normalized_activity: record.normalized_activity,
        },
    )?;
    tracing::info!("Added manual record {} ({})", id, name);

    Ok((StatusCode::CREATED, Json(json!({ "id": id }))))
}
