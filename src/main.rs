use anyhow::Result;
use std::sync::Arc;

use lane_activity::{config, logging, routes, services::record_store::RecordStore, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    logging::init_logging()?;

    // Load configuration
    let config = config::Config::new()?;
    let addr = config.bind_addr;

    // Open the record store
    let store = RecordStore::open(&config.database_path)
        .map_err(|e| anyhow::anyhow!("Failed to open record store: {}", e))?;

    // Build our application state
    let state = Arc::new(AppState::new(config, store));
    let app = routes::app(state);

    // Run it
    tracing::info!("listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
