//! CurrencyAPI provider.
//!
//! Credential-bearing: the API key is injected as the `apikey` query
//! parameter at dispatch time. It is never logged and never stored alongside
//! cached results. The API signals errors with an `errors` map keyed by
//! field name; rates live under `data.{CUR}.value`.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;

use crate::errors::{RateError, Result};
use crate::models::{ProviderDescriptor, RateResult};
use crate::provider::{decode_json, http_client, positive_rate, RateProvider};

/// Provider ID constant
const PROVIDER_ID: &str = "currency_api";

const LATEST_URL: &str = "https://api.currencyapi.com/v3/latest";
const HISTORICAL_URL: &str = "https://api.currencyapi.com/v3/historical";

/// Raw payload from CurrencyAPI.
#[derive(Debug, Deserialize)]
struct CurrencyApiResponse {
    /// Validation errors keyed by field name
    errors: Option<HashMap<String, CurrencyApiFieldError>>,
    /// Per-currency values keyed by target currency
    #[serde(default)]
    data: HashMap<String, CurrencyApiValue>,
}

#[derive(Debug, Deserialize)]
struct CurrencyApiFieldError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct CurrencyApiValue {
    value: f64,
}

/// CurrencyAPI provider for latest and historical exchange rates.
pub struct CurrencyApiProvider {
    client: Client,
    api_key: String,
}

impl CurrencyApiProvider {
    /// Create a new CurrencyAPI provider with the given API key.
    pub fn new(api_key: String) -> Self {
        Self {
            client: http_client(),
            api_key,
        }
    }

    /// Fail fast when no credential is configured; the upstream would reject
    /// the request anyway, without this being a transport failure.
    fn require_credential(&self) -> Result<()> {
        if self.api_key.is_empty() {
            return Err(RateError::rejected(PROVIDER_ID, "credential not configured"));
        }
        Ok(())
    }
}

/// Normalize a raw CurrencyAPI payload into a rate result.
fn normalize(
    raw: CurrencyApiResponse,
    base: &str,
    target: &str,
    date: Option<NaiveDate>,
) -> Result<RateResult> {
    if let Some(errors) = raw.errors {
        let message = errors
            .into_values()
            .next()
            .map(|e| e.message)
            .unwrap_or_else(|| "Unknown error".to_string());
        return Err(RateError::rejected(PROVIDER_ID, message));
    }

    let value = raw
        .data
        .get(target)
        .map(|v| v.value)
        .ok_or_else(|| RateError::RateUnavailable {
            currency: target.to_string(),
        })?;
    let rate = positive_rate(target, value)?;

    let rates = HashMap::from([(target.to_string(), rate)]);
    Ok(match date {
        Some(date) => RateResult::historical(base, rates, date),
        None => RateResult::latest(base, rates),
    })
}

#[async_trait]
impl RateProvider for CurrencyApiProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn descriptor(&self) -> ProviderDescriptor {
        ProviderDescriptor {
            id: PROVIDER_ID,
            display_name: "CurrencyAPI",
            latest_endpoint: LATEST_URL,
            historical_endpoint: HISTORICAL_URL,
            requires_credential: true,
            supports_historical: true,
        }
    }

    async fn fetch_latest(&self, base: &str, target: &str) -> Result<RateResult> {
        self.require_credential()?;

        let response = self
            .client
            .get(LATEST_URL)
            .query(&[
                ("base_currency", base),
                ("currencies", target),
                ("apikey", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| RateError::transport(PROVIDER_ID, &e))?;

        let raw: CurrencyApiResponse = decode_json(PROVIDER_ID, response).await?;
        normalize(raw, base, target, None)
    }

    async fn fetch_historical(
        &self,
        base: &str,
        target: &str,
        date: NaiveDate,
    ) -> Result<RateResult> {
        self.require_credential()?;

        let date_param = date.format("%Y-%m-%d").to_string();
        let response = self
            .client
            .get(HISTORICAL_URL)
            .query(&[
                ("base_currency", base),
                ("currencies", target),
                ("date", date_param.as_str()),
                ("apikey", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| RateError::transport(PROVIDER_ID, &e))?;

        let raw: CurrencyApiResponse = decode_json(PROVIDER_ID, response).await?;
        normalize(raw, base, target, Some(date))
    }
}
