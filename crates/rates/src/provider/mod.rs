//! Rate provider abstractions and implementations.
//!
//! This module contains:
//! - The `RateProvider` trait that all providers implement
//! - Concrete provider implementations (ExchangeRate-API, Frankfurter, CurrencyAPI)
//!
//! # Architecture
//!
//! Each provider module owns the serde types for its raw payload and a pure
//! normalization routine from that payload to [`RateResult`]. All
//! provider-specific field names and error shapes stay inside the provider
//! module; the resolver only ever sees the normalized shape. Adding a
//! provider means implementing `RateProvider` - the resolver does not change.

mod traits;

// Provider implementations
pub mod currency_api;
pub mod exchange_rate_api;
pub mod frankfurter;

// Re-exports
pub use currency_api::CurrencyApiProvider;
pub use exchange_rate_api::ExchangeRateApiProvider;
pub use frankfurter::FrankfurterProvider;
pub use traits::RateProvider;

use reqwest::Client;
use rust_decimal::Decimal;

use crate::errors::{RateError, Result};
use crate::models::RateResult;

/// Default HTTP request timeout for upstream calls.
pub(crate) const REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);

/// Build the HTTP client shared by all provider constructors.
///
/// The timeout is a hard requirement, so a builder failure (broken TLS
/// backend) aborts at construction rather than degrading to an unbounded
/// client.
pub(crate) fn http_client() -> Client {
    Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .expect("HTTP client construction failed")
}

/// Convert an upstream rate value, rejecting missing and non-positive rates.
pub(crate) fn positive_rate(currency: &str, value: f64) -> Result<Decimal> {
    if value <= 0.0 {
        return Err(RateError::RateUnavailable {
            currency: currency.to_string(),
        });
    }
    Decimal::try_from(value).map_err(|_| RateError::RateUnavailable {
        currency: currency.to_string(),
    })
}

/// Decode a provider response body, mapping decode failures to
/// `UpstreamRejected` (the payload is not what the provider documents).
pub(crate) async fn decode_json<T: serde::de::DeserializeOwned>(
    provider: &str,
    response: reqwest::Response,
) -> Result<T> {
    response
        .json::<T>()
        .await
        .map_err(|e| RateError::rejected(provider, format!("malformed payload: {}", e)))
}

/// Assert that a normalized result actually carries the requested target.
pub(crate) fn require_target(result: RateResult, target: &str) -> Result<RateResult> {
    if result.rate_for(target).is_none() {
        return Err(RateError::RateUnavailable {
            currency: target.to_string(),
        });
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    #[test]
    fn test_http_client_builds() {
        let _ = http_client();
    }

    #[test]
    fn test_positive_rate() {
        assert_eq!(positive_rate("EUR", 0.92).unwrap(), dec!(0.92));
        assert!(matches!(
            positive_rate("EUR", 0.0),
            Err(RateError::RateUnavailable { .. })
        ));
        assert!(matches!(
            positive_rate("EUR", -1.5),
            Err(RateError::RateUnavailable { .. })
        ));
    }

    #[test]
    fn test_require_target() {
        let result = RateResult::latest("USD", HashMap::from([("EUR".to_string(), dec!(0.92))]));
        assert!(require_target(result.clone(), "EUR").is_ok());
        assert!(matches!(
            require_target(result, "GBP"),
            Err(RateError::RateUnavailable { .. })
        ));
    }
}
