//! HTTP routing for the rate service.

mod currencies;
mod health;
mod providers;
mod rates;

use std::sync::Arc;

use axum::routing::get;
use axum::{Json, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use crate::main_lib::AppState;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Ratehub Exchange Rate API",
        description = "Exchange rate aggregation with real-time and historical data"
    ),
    components(schemas(
        crate::error::ErrorBody,
        models::ConvertRequest,
        models::ExchangeRateResponse,
        models::HistoricalRateResponse,
        models::CurrencyListResponse,
        models::BulkConversionRequest,
        models::BulkConversionResponse,
        models::CompareResponse,
        models::ProviderInfo,
        models::ProvidersResponse,
        models::HealthResponse,
    ))
)]
struct ApiDoc;

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Build the application router with all resource routes and middleware.
pub fn app_router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(health::router())
        .merge(rates::router())
        .merge(currencies::router())
        .merge(providers::router())
        .route("/api-docs/openapi.json", get(openapi_json))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
