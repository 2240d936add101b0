use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use ratehub_rates::CompareOutcome;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Body of `POST /rates/convert`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ConvertRequest {
    pub base_currency: String,
    pub target_currency: String,
    #[serde(default = "default_amount")]
    pub amount: Decimal,
}

pub fn default_amount() -> Decimal {
    Decimal::ONE
}

/// Single-pair conversion result.
#[derive(Debug, Serialize, ToSchema)]
pub struct ExchangeRateResponse {
    pub base_currency: String,
    pub target_currency: String,
    pub exchange_rate: Decimal,
    pub amount: Decimal,
    pub converted_amount: Decimal,
    pub last_updated: DateTime<Utc>,
}

/// Historical rate result. `date` echoes the requested date, even when the
/// provider substituted the latest rate.
#[derive(Debug, Serialize, ToSchema)]
pub struct HistoricalRateResponse {
    pub base_currency: String,
    pub target_currency: String,
    pub exchange_rate: Decimal,
    pub date: String,
    pub last_updated: DateTime<Utc>,
}

/// Supported currency listing.
#[derive(Debug, Serialize, ToSchema)]
pub struct CurrencyListResponse {
    pub currencies: BTreeMap<String, String>,
    pub count: usize,
}

/// Body of `POST /rates/bulk-convert`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct BulkConversionRequest {
    pub base_currency: String,
    /// List of `{currency: amount}` pairs.
    pub conversions: Vec<HashMap<String, Decimal>>,
}

/// Bulk conversion result, keyed `{CURRENCY}_{amount}`.
#[derive(Debug, Serialize, ToSchema)]
pub struct BulkConversionResponse {
    pub base_currency: String,
    pub conversions: BTreeMap<String, Decimal>,
    pub timestamp: DateTime<Utc>,
}

/// Multi-currency comparison result; failed currencies carry an error
/// string in place of the rate.
#[derive(Debug, Serialize, ToSchema)]
pub struct CompareResponse {
    pub base_currency: String,
    #[schema(value_type = Object)]
    pub rates: BTreeMap<String, CompareOutcome>,
    pub timestamp: DateTime<Utc>,
    pub compared_currencies: Vec<String>,
    pub provider: String,
}

/// One registered provider, as listed by `GET /providers`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProviderInfo {
    pub name: String,
    pub requires_key: bool,
    pub supports_historical: bool,
}

/// Provider listing.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProvidersResponse {
    pub providers: BTreeMap<String, ProviderInfo>,
    pub default_provider: String,
}

/// Health check payload for `GET /`.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub message: String,
    pub version: String,
    pub timestamp: DateTime<Utc>,
    pub providers: Vec<String>,
}
