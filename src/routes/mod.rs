use axum::{extract::DefaultBodyLimit, routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::AppState;

pub mod records;
pub mod sheets;

pub fn app(state: Arc<AppState>) -> Router {
    // Multipart framing needs some room on top of the file itself.
    let body_limit = state.config.max_file_size + 64 * 1024;

    Router::new()
        .route("/health", get(health_check))
        .merge(sheets::routes())
        .merge(records::routes())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
