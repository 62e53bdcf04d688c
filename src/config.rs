use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::net::SocketAddr;
use std::path::PathBuf;

fn default_max_file_size() -> usize {
    // 10 MB in bytes
    10 * 1024 * 1024
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub database_path: PathBuf,
    pub max_file_size: usize,
}

impl Config {
    pub fn new() -> Result<Self> {
        // Load .env file first
        dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let bind_addr = match lookup("BIND_ADDR") {
            Some(addr) => addr
                .parse()
                .with_context(|| format!("Invalid BIND_ADDR: {}", addr))?,
            None => SocketAddr::from(([127, 0, 0, 1], 3000)),
        };

        let database_path = lookup("DATABASE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("records.sqlite3"));

        let max_file_size = match lookup("MAX_UPLOAD_BYTES") {
            Some(size) => size
                .parse()
                .with_context(|| format!("Invalid MAX_UPLOAD_BYTES: {}", size))?,
            None => default_max_file_size(),
        };

        Ok(Config {
            bind_addr,
            database_path,
            max_file_size,
        })
    }
}
