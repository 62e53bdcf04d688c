//! Extracts time-normalized lane activities from loosely structured assay
//! spreadsheets, and serves uploads of them over HTTP.

pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod routes;
pub mod services;

use services::record_store::RecordStore;

// Application state
pub struct AppState {
    pub config: config::Config,
    pub store: RecordStore,
}

impl AppState {
    pub fn new(config: config::Config, store: RecordStore) -> Self {
        Self { config, store }
    }
}
