use axum::{
    extract::{Multipart, State},
    routing::post,
    Router,
    Json,
    http::Method,
};
use bytes::Bytes;
use std::sync::Arc;
use crate::{
    AppState,
    error::AppError,
    services::excel::{ExcelProcessor, ProcessedUpload},
};
use tower_http::cors::{CorsLayer, Any};

pub fn routes() -> Router<Arc<AppState>> {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
        .max_age(std::time::Duration::from_secs(3600));

    Router::new()
        .route("/sheets/extract", post(extract_sheet))
        .layer(cors)
}

/// First multipart field named `file`, as (filename, contents).
async fn read_file_part(multipart: &mut Multipart) -> Result<Option<(String, Bytes)>, AppError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let data = field.bytes().await?;
        return Ok(Some((file_name, data)));
    }
    Ok(None)
}

async fn extract_sheet(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<ProcessedUpload>, AppError> {
    let start = std::time::Instant::now();

    let (file_name, file_data) = read_file_part(&mut multipart)
        .await?
        .ok_or_else(|| AppError::InvalidInput("No file part".to_string()))?;

    if file_name.is_empty() {
        return Err(AppError::InvalidInput("No selected file".to_string()));
    }
    if file_data.len() > state.config.max_file_size {
        tracing::warn!("Rejecting {}: {} bytes exceeds limit", file_name, file_data.len());
        return Err(AppError::InvalidInput(format!(
            "File exceeds the {} byte upload limit",
            state.config.max_file_size
        )));
    }

    tracing::info!("Received upload {} ({}KB)", file_name, file_data.len() / 1024);

    let worker_state = state.clone();
    let upload = tokio::task::spawn_blocking(move || {
        ExcelProcessor::new(&worker_state.store).process_file(&file_name, &file_data)
    })
    .await
    .map_err(|e| AppError::Internal(format!("Extraction task failed: {}", e)))??;

    tracing::info!("Upload {} handled in {:?}: {}", upload.source, start.elapsed(), upload.summary);
    Ok(Json(upload))
}
