//! Normalized rate result shape shared by all providers.

use std::collections::HashMap;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

/// When a rate result was observed.
///
/// Latest lookups carry a Unix timestamp, historical lookups the requested
/// calendar date - never both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AsOf {
    /// Unix timestamp of a latest-rate lookup.
    Timestamp(i64),
    /// Calendar date of a historical lookup.
    Date(NaiveDate),
}

/// Normalized result of a successful rate lookup.
///
/// Constructing a `RateResult` implies success; failed lookups surface as
/// [`RateError`](crate::errors::RateError) and never materialize here.
#[derive(Debug, Clone, Serialize)]
pub struct RateResult {
    /// Base currency, upper-cased 3-letter code.
    pub base: String,
    /// Target currency code to positive rate.
    pub rates: HashMap<String, Decimal>,
    /// When the rates were observed.
    pub as_of: AsOf,
}

impl RateResult {
    /// Build a latest-rate result stamped with the current time.
    pub fn latest(base: impl Into<String>, rates: HashMap<String, Decimal>) -> Self {
        Self {
            base: base.into().to_uppercase(),
            rates,
            as_of: AsOf::Timestamp(Utc::now().timestamp()),
        }
    }

    /// Build a historical result for the given date.
    pub fn historical(
        base: impl Into<String>,
        rates: HashMap<String, Decimal>,
        date: NaiveDate,
    ) -> Self {
        Self {
            base: base.into().to_uppercase(),
            rates,
            as_of: AsOf::Date(date),
        }
    }

    /// Rate for the given upper-cased target currency, if present.
    pub fn rate_for(&self, target: &str) -> Option<Decimal> {
        self.rates.get(target).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_latest_uppercases_base() {
        let result = RateResult::latest("usd", HashMap::from([("EUR".to_string(), dec!(0.92))]));
        assert_eq!(result.base, "USD");
        assert!(matches!(result.as_of, AsOf::Timestamp(_)));
        assert_eq!(result.rate_for("EUR"), Some(dec!(0.92)));
        assert_eq!(result.rate_for("GBP"), None);
    }

    #[test]
    fn test_historical_carries_date() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let result =
            RateResult::historical("USD", HashMap::from([("EUR".to_string(), dec!(0.9))]), date);
        assert_eq!(result.as_of, AsOf::Date(date));
    }
}
