//! Tabula Server Binary
//!
//! Standalone server for the weather forecast API.

use std::sync::Arc;

use tabula_server::{serve, AppState};
use tabula_store::StorageOptions;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let directory = std::env::var("TABULA_DB_DIR").unwrap_or_else(|_| ".".to_string());
    let filename = std::env::var("TABULA_DB_FILE").unwrap_or_else(|_| "tabula.db".to_string());
    let addr = std::env::var("TABULA_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());

    let options = StorageOptions::new(directory, filename);
    let state = Arc::new(AppState::open(&options)?);

    serve(&addr, state).await
}
