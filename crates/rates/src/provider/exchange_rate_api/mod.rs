//! ExchangeRate-API provider.
//!
//! Free tier, no credential. Latest rates only: historical requests fall
//! through to the latest-rate operation. The API signals errors with a
//! top-level `result == "error"` flag plus an `error` message field.

use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::errors::{RateError, Result};
use crate::models::{ProviderDescriptor, RateResult};
use crate::provider::{decode_json, http_client, positive_rate, RateProvider};

/// Provider ID constant
const PROVIDER_ID: &str = "exchangerate_api";

const LATEST_URL: &str = "https://api.exchangerate-api.com/v4/latest/";
const HISTORICAL_URL: &str = "https://api.exchangerate-api.com/v4/history/";

/// Raw payload from ExchangeRate-API.
#[derive(Debug, Deserialize)]
struct ExchangeRateApiResponse {
    /// "error" when the request failed
    result: Option<String>,
    /// Error message, present alongside `result == "error"`
    error: Option<String>,
    /// Rates keyed by target currency
    #[serde(default)]
    rates: HashMap<String, f64>,
}

/// ExchangeRate-API provider for latest exchange rates.
pub struct ExchangeRateApiProvider {
    client: Client,
}

impl ExchangeRateApiProvider {
    /// Create a new ExchangeRate-API provider.
    pub fn new() -> Self {
        Self {
            client: http_client(),
        }
    }
}

impl Default for ExchangeRateApiProvider {
    fn default() -> Self {
        Self::new()
    }
}

/// Normalize a raw ExchangeRate-API payload into a rate result.
///
/// Pure transformation: detects the provider's error shape and the
/// missing/non-positive target cases, with no I/O.
fn normalize_latest(
    raw: ExchangeRateApiResponse,
    base: &str,
    target: &str,
) -> Result<RateResult> {
    if raw.result.as_deref() == Some("error") {
        return Err(RateError::rejected(
            PROVIDER_ID,
            raw.error.unwrap_or_else(|| "Unknown error".to_string()),
        ));
    }

    let value = raw
        .rates
        .get(target)
        .copied()
        .ok_or_else(|| RateError::RateUnavailable {
            currency: target.to_string(),
        })?;
    let rate = positive_rate(target, value)?;

    Ok(RateResult::latest(
        base,
        HashMap::from([(target.to_string(), rate)]),
    ))
}

#[async_trait]
impl RateProvider for ExchangeRateApiProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn descriptor(&self) -> ProviderDescriptor {
        ProviderDescriptor {
            id: PROVIDER_ID,
            display_name: "ExchangeRate-API",
            latest_endpoint: LATEST_URL,
            historical_endpoint: HISTORICAL_URL,
            requires_credential: false,
            supports_historical: false,
        }
    }

    async fn fetch_latest(&self, base: &str, target: &str) -> Result<RateResult> {
        let url = format!("{}{}", LATEST_URL, base);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| RateError::transport(PROVIDER_ID, &e))?;

        let raw: ExchangeRateApiResponse = decode_json(PROVIDER_ID, response).await?;
        normalize_latest(raw, base, target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn parse(body: &str) -> ExchangeRateApiResponse {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn test_normalize_success() {
        let raw = parse(r#"{"base": "USD", "rates": {"EUR": 0.92, "GBP": 0.79}}"#);
        let result = normalize_latest(raw, "USD", "EUR").unwrap();
        assert_eq!(result.base, "USD");
        assert_eq!(result.rate_for("EUR"), Some(dec!(0.92)));
        // Only the requested target is carried
        assert_eq!(result.rate_for("GBP"), None);
    }

    #[test]
    fn test_normalize_error_flag() {
        let raw = parse(r#"{"result": "error", "error": "Unsupported base"}"#);
        let err = normalize_latest(raw, "XXX", "EUR").unwrap_err();
        match err {
            RateError::UpstreamRejected { provider, message } => {
                assert_eq!(provider, PROVIDER_ID);
                assert_eq!(message, "Unsupported base");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_normalize_missing_target() {
        let raw = parse(r#"{"base": "USD", "rates": {"EUR": 0.92}}"#);
        let err = normalize_latest(raw, "USD", "ZZZ").unwrap_err();
        assert!(matches!(err, RateError::RateUnavailable { currency } if currency == "ZZZ"));
    }

    #[test]
    fn test_normalize_zero_rate() {
        let raw = parse(r#"{"base": "USD", "rates": {"EUR": 0.0}}"#);
        let err = normalize_latest(raw, "USD", "EUR").unwrap_err();
        assert!(matches!(err, RateError::RateUnavailable { .. }));
    }

    #[test]
    fn test_descriptor() {
        let provider = ExchangeRateApiProvider::new();
        let descriptor = provider.descriptor();
        assert_eq!(provider.id(), "exchangerate_api");
        assert!(!descriptor.requires_credential);
        assert!(!descriptor.supports_historical);
    }
}
