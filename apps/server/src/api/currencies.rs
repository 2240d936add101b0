use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use crate::main_lib::AppState;
use crate::models::CurrencyListResponse;

/// Get the list of supported currencies.
async fn get_currencies(State(state): State<Arc<AppState>>) -> Json<CurrencyListResponse> {
    let list = state.resolver.get_currency_list().await;
    Json(CurrencyListResponse {
        currencies: list.entries().clone(),
        count: list.len(),
    })
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/currencies", get(get_currencies))
}
