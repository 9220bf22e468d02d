//! Tabula Server - Weather Forecast API
//!
//! Thin HTTP surface exposing the weather forecast record type through the
//! Tabula repository.

pub mod forecast;
pub mod http;

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use tabula_store::{SqliteRepository, StorageOptions, StoreError};

use crate::forecast::WeatherForecast;

/// Shared application state.
pub struct AppState {
    pub forecasts: SqliteRepository<WeatherForecast>,
}

impl AppState {
    /// Open the forecast repository at the configured location.
    ///
    /// Fails fatally if the database cannot be opened or its table cannot
    /// be created.
    pub fn open(options: &StorageOptions) -> Result<Self, StoreError> {
        Ok(Self {
            forecasts: SqliteRepository::open(options)?,
        })
    }

    /// Ephemeral state backed by an in-memory database.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Ok(Self {
            forecasts: SqliteRepository::open_in_memory()?,
        })
    }
}

/// Create the API router.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/forecasts",
            get(http::list_forecasts)
                .post(http::create_forecast)
                .delete(http::delete_forecasts),
        )
        .route("/forecasts/degrees/16", get(http::sixteen_degree_forecasts))
        .route("/forecasts/degrees/{degree}", get(http::forecasts_by_degree))
        .route(
            "/forecasts/{id}",
            get(http::get_forecast)
                .put(http::update_forecast)
                .delete(http::delete_forecast),
        )
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the server.
pub async fn serve(addr: &str, state: Arc<AppState>) -> Result<(), Box<dyn std::error::Error>> {
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("tabula server listening on {}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}
