use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;

use crate::main_lib::AppState;
use crate::models::HealthResponse;

/// Health check endpoint.
async fn root(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let providers = state
        .registry
        .descriptors()
        .iter()
        .map(|descriptor| descriptor.id.to_string())
        .collect();

    Json(HealthResponse {
        message: "Exchange Rate API is running".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
        providers,
    })
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/", get(root))
}
