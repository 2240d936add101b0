//! Frankfurter provider.
//!
//! Free tier, no credential, historical coverage. This is the default
//! provider the resolver falls back to on transport failures. The API
//! signals errors with a top-level `error` field and otherwise returns its
//! own `base` plus a `rates` map.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;

use crate::errors::{RateError, Result};
use crate::models::{ProviderDescriptor, RateResult};
use crate::provider::{decode_json, http_client, positive_rate, require_target, RateProvider};

/// Provider ID constant
const PROVIDER_ID: &str = "frankfurter";

const LATEST_URL: &str = "https://api.frankfurter.app/latest";
const HISTORICAL_URL: &str = "https://api.frankfurter.app/";

/// Raw payload from Frankfurter.
#[derive(Debug, Deserialize)]
struct FrankfurterResponse {
    /// Error message when the request failed
    error: Option<String>,
    /// Base currency as reported by the API
    base: Option<String>,
    /// Rates keyed by target currency
    #[serde(default)]
    rates: HashMap<String, f64>,
}

/// Frankfurter provider for latest and historical exchange rates.
pub struct FrankfurterProvider {
    client: Client,
}

impl FrankfurterProvider {
    /// Create a new Frankfurter provider.
    pub fn new() -> Self {
        Self {
            client: http_client(),
        }
    }
}

impl Default for FrankfurterProvider {
    fn default() -> Self {
        Self::new()
    }
}

/// Normalize a raw Frankfurter payload into a rate result.
///
/// Frankfurter returns the full rates map for the requested pair; the
/// requested target must be present and positive, other entries are carried
/// through when convertible.
fn normalize(
    raw: FrankfurterResponse,
    base: &str,
    target: &str,
    date: Option<NaiveDate>,
) -> Result<RateResult> {
    if let Some(message) = raw.error {
        return Err(RateError::rejected(PROVIDER_ID, message));
    }

    let value = raw
        .rates
        .get(target)
        .copied()
        .ok_or_else(|| RateError::RateUnavailable {
            currency: target.to_string(),
        })?;
    positive_rate(target, value)?;

    let mut rates = HashMap::with_capacity(raw.rates.len());
    for (currency, value) in raw.rates {
        if let Ok(rate) = positive_rate(&currency, value) {
            rates.insert(currency, rate);
        }
    }

    let base = raw.base.unwrap_or_else(|| base.to_string());
    let result = match date {
        Some(date) => RateResult::historical(base, rates, date),
        None => RateResult::latest(base, rates),
    };
    require_target(result, target)
}

#[async_trait]
impl RateProvider for FrankfurterProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn descriptor(&self) -> ProviderDescriptor {
        ProviderDescriptor {
            id: PROVIDER_ID,
            display_name: "Frankfurter",
            latest_endpoint: LATEST_URL,
            historical_endpoint: HISTORICAL_URL,
            requires_credential: false,
            supports_historical: true,
        }
    }

    async fn fetch_latest(&self, base: &str, target: &str) -> Result<RateResult> {
        let response = self
            .client
            .get(LATEST_URL)
            .query(&[("from", base), ("to", target)])
            .send()
            .await
            .map_err(|e| RateError::transport(PROVIDER_ID, &e))?;

        let raw: FrankfurterResponse = decode_json(PROVIDER_ID, response).await?;
        normalize(raw, base, target, None)
    }

    async fn fetch_historical(
        &self,
        base: &str,
        target: &str,
        date: NaiveDate,
    ) -> Result<RateResult> {
        let url = format!("{}{}", HISTORICAL_URL, date.format("%Y-%m-%d"));

        let response = self
            .client
            .get(&url)
            .query(&[("from", base), ("to", target)])
            .send()
            .await
            .map_err(|e| RateError::transport(PROVIDER_ID, &e))?;

        let raw: FrankfurterResponse = decode_json(PROVIDER_ID, response).await?;
        normalize(raw, base, target, Some(date))
    }
}
