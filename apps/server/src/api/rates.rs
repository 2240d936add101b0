use std::sync::Arc;

use axum::extract::{Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use ratehub_rates::{normalize_code, AsOf, RateError, RateResult};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::ApiResult;
use crate::main_lib::AppState;
use crate::models::{
    default_amount, BulkConversionRequest, BulkConversionResponse, CompareResponse,
    ConvertRequest, ExchangeRateResponse, HistoricalRateResponse,
};

#[derive(Deserialize)]
struct LatestQuery {
    base_currency: String,
    target_currency: String,
    #[serde(default = "default_amount")]
    amount: Decimal,
    provider: Option<String>,
}

#[derive(Deserialize)]
struct HistoricalQuery {
    base_currency: String,
    target_currency: String,
    date: String,
    provider: Option<String>,
}

#[derive(Deserialize)]
struct CompareQuery {
    base_currency: String,
    /// Comma-separated list of target currencies.
    target_currencies: String,
    provider: Option<String>,
}

#[derive(Deserialize)]
struct ProviderQuery {
    provider: Option<String>,
}

/// Observation time of a result, for the `last_updated` response field.
fn last_updated(result: &RateResult) -> DateTime<Utc> {
    match result.as_of {
        AsOf::Timestamp(ts) => DateTime::from_timestamp(ts, 0).unwrap_or_else(Utc::now),
        AsOf::Date(_) => Utc::now(),
    }
}

fn conversion_response(
    result: &RateResult,
    target: String,
    amount: Decimal,
) -> ApiResult<ExchangeRateResponse> {
    let rate = result
        .rate_for(&target)
        .ok_or_else(|| RateError::RateUnavailable {
            currency: target.clone(),
        })?;
    Ok(ExchangeRateResponse {
        base_currency: result.base.clone(),
        target_currency: target,
        exchange_rate: rate,
        amount,
        converted_amount: amount * rate,
        last_updated: last_updated(result),
    })
}

/// Get the latest exchange rate between two currencies.
async fn get_latest_rate(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LatestQuery>,
) -> ApiResult<Json<ExchangeRateResponse>> {
    let result = state
        .resolver
        .get_latest(
            &query.base_currency,
            &query.target_currency,
            query.provider.as_deref(),
        )
        .await?;
    let target = normalize_code(&query.target_currency)?;
    Ok(Json(conversion_response(&result, target, query.amount)?))
}

/// Convert an amount from one currency to another.
async fn convert_currency(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ProviderQuery>,
    Json(body): Json<ConvertRequest>,
) -> ApiResult<Json<ExchangeRateResponse>> {
    let result = state
        .resolver
        .get_latest(
            &body.base_currency,
            &body.target_currency,
            query.provider.as_deref(),
        )
        .await?;
    let target = normalize_code(&body.target_currency)?;
    Ok(Json(conversion_response(&result, target, body.amount)?))
}

/// Get the historical exchange rate for a specific date.
async fn get_historical_rate(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HistoricalQuery>,
) -> ApiResult<Json<HistoricalRateResponse>> {
    let result = state
        .resolver
        .get_historical(
            &query.base_currency,
            &query.target_currency,
            &query.date,
            query.provider.as_deref(),
        )
        .await?;
    let target = normalize_code(&query.target_currency)?;
    let rate = result
        .rate_for(&target)
        .ok_or_else(|| RateError::RateUnavailable {
            currency: target.clone(),
        })?;
    Ok(Json(HistoricalRateResponse {
        base_currency: result.base.clone(),
        target_currency: target,
        exchange_rate: rate,
        date: query.date,
        last_updated: Utc::now(),
    }))
}

/// Convert amounts to multiple currencies at once.
async fn bulk_convert_currency(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ProviderQuery>,
    Json(body): Json<BulkConversionRequest>,
) -> ApiResult<Json<BulkConversionResponse>> {
    let conversions = state
        .aggregator
        .bulk_convert(
            &body.base_currency,
            &body.conversions,
            query.provider.as_deref(),
        )
        .await?;
    let base_currency = normalize_code(&body.base_currency)?;
    Ok(Json(BulkConversionResponse {
        base_currency,
        conversions,
        timestamp: Utc::now(),
    }))
}

/// Compare exchange rates for multiple currencies.
async fn compare_currencies(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CompareQuery>,
) -> ApiResult<Json<CompareResponse>> {
    let targets: Vec<String> = query
        .target_currencies
        .split(',')
        .map(|code| code.trim().to_ascii_uppercase())
        .filter(|code| !code.is_empty())
        .collect();

    let rates = state
        .aggregator
        .compare(&query.base_currency, &targets, query.provider.as_deref())
        .await;
    let base_currency = normalize_code(&query.base_currency)?;
    let provider = state
        .registry
        .resolve_id(query.provider.as_deref())
        .to_string();

    Ok(Json(CompareResponse {
        base_currency,
        rates,
        timestamp: Utc::now(),
        compared_currencies: targets,
        provider,
    }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/rates/latest", get(get_latest_rate))
        .route("/rates/convert", post(convert_currency))
        .route("/rates/historical", get(get_historical_rate))
        .route("/rates/bulk-convert", post(bulk_convert_currency))
        .route("/rates/compare", get(compare_currencies))
}
