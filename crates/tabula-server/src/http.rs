//! HTTP endpoint handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tabula_core::{Filter, SortKey};
use tabula_store::{Repository, StoreError};

use crate::forecast::WeatherForecast;
use crate::AppState;

/// A forecast as returned to clients, with the derived Fahrenheit reading.
#[derive(Debug, Serialize)]
pub struct ForecastResponse {
    pub id: Option<i64>,
    pub date_ms: i64,
    pub temperature_c: i64,
    pub temperature_f: i64,
    pub summary: Option<String>,
}

impl From<WeatherForecast> for ForecastResponse {
    fn from(forecast: WeatherForecast) -> Self {
        Self {
            temperature_f: forecast.temperature_f(),
            id: forecast.id,
            date_ms: forecast.date_ms,
            temperature_c: forecast.temperature_c,
            summary: forecast.summary,
        }
    }
}

/// Request body for creating or updating a forecast.
#[derive(Debug, Deserialize)]
pub struct ForecastRequest {
    pub date_ms: i64,
    pub temperature_c: i64,
    pub summary: Option<String>,
}

impl ForecastRequest {
    fn into_forecast(self, id: Option<i64>) -> WeatherForecast {
        WeatherForecast {
            id,
            date_ms: self.date_ms,
            temperature_c: self.temperature_c,
            summary: self.summary,
        }
    }
}

/// Query parameters for the list endpoint.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Comma-separated identity list; when present the key-set path is used
    /// and pagination is skipped.
    pub ids: Option<String>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

/// Query parameters for the bulk delete endpoint.
#[derive(Debug, Deserialize)]
pub struct DeleteQuery {
    /// Comma-separated identity list; absent means clear the whole table.
    pub ids: Option<String>,
}

/// Pagination metadata mirrored into the `x-pagination` response header.
#[derive(Debug, Serialize)]
pub struct PaginationMetadata {
    pub total_count: usize,
    pub page_size: i64,
    pub current_page: i64,
    pub total_pages: i64,
}

fn internal(err: StoreError) -> (StatusCode, String) {
    (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
}

fn parse_ids(raw: &str) -> Result<Vec<i64>, (StatusCode, String)> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<i64>()
                .map_err(|_| (StatusCode::BAD_REQUEST, format!("invalid id: {s}")))
        })
        .collect()
}

fn to_responses(forecasts: Vec<WeatherForecast>) -> Vec<ForecastResponse> {
    forecasts.into_iter().map(ForecastResponse::from).collect()
}

/// List forecasts: by key set when `ids` is given, otherwise paginated and
/// ordered by temperature, with pagination metadata in the `x-pagination`
/// header.
pub async fn list_forecasts(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<Response, (StatusCode, String)> {
    if let Some(raw) = &query.ids {
        let ids = parse_ids(raw)?;
        let found = state.forecasts.get_many(&ids).await.map_err(internal)?;
        return Ok(Json(to_responses(found)).into_response());
    }

    let page = query.page.unwrap_or(1);
    let page_size = query.page_size.unwrap_or(10);

    let total_count = state.forecasts.count(None).await.map_err(internal)?;
    let metadata = PaginationMetadata {
        total_count,
        page_size,
        current_page: page,
        total_pages: (total_count as f64 / page_size.max(1) as f64).ceil() as i64,
    };

    let forecasts = state
        .forecasts
        .get_all(
            None,
            Some(SortKey::by(|f: &WeatherForecast| f.temperature_c)),
            Some(page),
            Some(page_size),
        )
        .await
        .map_err(internal)?;

    let metadata = serde_json::to_string(&metadata)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    let mut headers = HeaderMap::new();
    headers.insert(
        HeaderName::from_static("x-pagination"),
        HeaderValue::from_str(&metadata)
            .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?,
    );

    Ok((headers, Json(to_responses(forecasts))).into_response())
}

/// Get one forecast.
pub async fn get_forecast(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<ForecastResponse>, StatusCode> {
    state
        .forecasts
        .get(id)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .map(|forecast| Json(forecast.into()))
        .ok_or(StatusCode::NOT_FOUND)
}

/// Create a forecast; the assigned identity is in the response body.
pub async fn create_forecast(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ForecastRequest>,
) -> Result<(StatusCode, Json<ForecastResponse>), (StatusCode, String)> {
    let mut forecast = request.into_forecast(None);
    state.forecasts.add(&mut forecast).await.map_err(internal)?;

    Ok((StatusCode::CREATED, Json(forecast.into())))
}

/// Update the forecast at the path identity; the body's identity, if any,
/// is ignored.
pub async fn update_forecast(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(request): Json<ForecastRequest>,
) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
    let mut forecast = request.into_forecast(Some(id));
    let affected = state
        .forecasts
        .update(&mut forecast)
        .await
        .map_err(internal)?;

    Ok(Json(serde_json::json!({ "rows_affected": affected })))
}

/// Delete one forecast by identity.
pub async fn delete_forecast(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
    let affected = state.forecasts.delete(id).await.map_err(internal)?;
    Ok(Json(serde_json::json!({ "rows_affected": affected })))
}

/// Bulk delete: the given key set, or the whole table when no ids are given.
pub async fn delete_forecasts(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DeleteQuery>,
) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
    let affected = match &query.ids {
        Some(raw) => {
            let ids = parse_ids(raw)?;
            state.forecasts.delete_many(&ids).await.map_err(internal)?
        }
        None => state.forecasts.clear_table().await.map_err(internal)?,
    };

    Ok(Json(serde_json::json!({ "rows_affected": affected })))
}

/// Forecasts at an exact temperature, date-ascending.
pub async fn forecasts_by_degree(
    State(state): State<Arc<AppState>>,
    Path(degree): Path<i64>,
) -> Result<Json<Vec<ForecastResponse>>, (StatusCode, String)> {
    let forecasts = state
        .forecasts
        .get_all(
            Some(Filter::new(move |f: &WeatherForecast| {
                f.temperature_c == degree
            })),
            Some(SortKey::by(|f: &WeatherForecast| f.date_ms)),
            None,
            None,
        )
        .await
        .map_err(internal)?;

    Ok(Json(to_responses(forecasts)))
}

/// The sixteen-degree listing, in storage order.
pub async fn sixteen_degree_forecasts(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ForecastResponse>>, (StatusCode, String)> {
    let forecasts = state
        .forecasts
        .get_all(
            Some(Filter::new(|f: &WeatherForecast| f.temperature_c == 16)),
            None,
            None,
            None,
        )
        .await
        .map_err(internal)?;

    Ok(Json(to_responses(forecasts)))
}
