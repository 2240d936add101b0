//! Multi-currency operations built on the rate resolver.
//!
//! Both operations isolate per-currency failures: one currency failing never
//! aborts the others. They differ in how a failure is reported -
//! `bulk_convert` silently omits the failed currency's conversions, while
//! `compare` keeps one entry per requested currency and stores an error
//! string in place of the rate. The asymmetry is intentional and preserved.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use futures::future::join_all;
use log::debug;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::errors::{RateError, Result};
use crate::resolver::RateResolver;

/// Per-currency outcome of a comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CompareOutcome {
    /// The looked-up rate.
    Rate(Decimal),
    /// Human-readable error string, stored in place of the rate.
    Error(String),
}

/// Bulk conversion and comparison over the rate resolver.
pub struct Aggregator {
    resolver: Arc<RateResolver>,
}

impl Aggregator {
    /// Create an aggregator over the given resolver.
    pub fn new(resolver: Arc<RateResolver>) -> Self {
        Self { resolver }
    }

    /// Convert amounts to multiple currencies at once.
    ///
    /// Each distinct target currency is looked up once; amounts sharing a
    /// currency reuse that rate. A failed currency is skipped and its
    /// conversions omitted - partial success is the normal outcome. An
    /// empty input fails `EmptyRequest` before any lookup.
    ///
    /// Output keys are `{CURRENCY}_{amount}`; two entries with the same
    /// currency and amount collapse into one key.
    pub async fn bulk_convert(
        &self,
        base: &str,
        conversions: &[HashMap<String, Decimal>],
        provider: Option<&str>,
    ) -> Result<BTreeMap<String, Decimal>> {
        if conversions.is_empty() {
            return Err(RateError::EmptyRequest);
        }

        let targets: BTreeSet<String> = conversions
            .iter()
            .flat_map(|entry| entry.keys())
            .map(|code| code.trim().to_ascii_uppercase())
            .collect();

        let mut converted = BTreeMap::new();
        for currency in &targets {
            let rate = match self.resolver.get_latest(base, currency, provider).await {
                Ok(result) => match result.rate_for(currency) {
                    Some(rate) => rate,
                    None => continue,
                },
                Err(err) => {
                    debug!("skipping {} in bulk conversion: {}", currency, err);
                    continue;
                }
            };

            for entry in conversions {
                for (code, amount) in entry {
                    if code.trim().eq_ignore_ascii_case(currency) {
                        converted.insert(format!("{}_{}", currency, amount), amount * rate);
                    }
                }
            }
        }

        Ok(converted)
    }

    /// Compare rates for multiple currencies against one base.
    ///
    /// Always returns one entry per requested currency: a numeric rate on
    /// success, an error string on failure. Lookups run concurrently - each
    /// is independent and idempotent.
    pub async fn compare(
        &self,
        base: &str,
        targets: &[String],
        provider: Option<&str>,
    ) -> BTreeMap<String, CompareOutcome> {
        let lookups = targets.iter().map(|target| async move {
            let currency = target.trim().to_ascii_uppercase();
            let outcome = match self.resolver.get_latest(base, &currency, provider).await {
                Ok(result) => match result.rate_for(&currency) {
                    Some(rate) => CompareOutcome::Rate(rate),
                    None => CompareOutcome::Error(format!(
                        "Error: {}",
                        RateError::RateUnavailable {
                            currency: currency.clone(),
                        }
                    )),
                },
                Err(err) => CompareOutcome::Error(format!("Error: {}", err)),
            };
            (currency, outcome)
        });

        join_all(lookups).await.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::RateCache;
    use crate::models::{ProviderDescriptor, RateResult};
    use crate::provider::RateProvider;
    use crate::registry::ProviderRegistry;
    use async_trait::async_trait;
    use rust_decimal_macros::dec;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubProvider {
        rates: HashMap<String, Decimal>,
        calls: AtomicUsize,
    }

    impl StubProvider {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                rates: HashMap::from([
                    ("EUR".to_string(), dec!(0.92)),
                    ("GBP".to_string(), dec!(0.79)),
                ]),
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl RateProvider for StubProvider {
        fn id(&self) -> &'static str {
            "frankfurter"
        }

        fn descriptor(&self) -> ProviderDescriptor {
            ProviderDescriptor {
                id: "frankfurter",
                display_name: "Stub",
                latest_endpoint: "http://stub/latest",
                historical_endpoint: "http://stub/historical",
                requires_credential: false,
                supports_historical: true,
            }
        }

        async fn fetch_latest(&self, base: &str, target: &str) -> Result<RateResult> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.rates.get(target) {
                Some(rate) => Ok(RateResult::latest(
                    base,
                    HashMap::from([(target.to_string(), *rate)]),
                )),
                None => Err(RateError::RateUnavailable {
                    currency: target.to_string(),
                }),
            }
        }
    }

    fn aggregator_with(stub: Arc<StubProvider>) -> Aggregator {
        let registry = Arc::new(ProviderRegistry::new(
            vec![stub as Arc<dyn RateProvider>],
            "frankfurter",
        ));
        let resolver = Arc::new(RateResolver::new(registry, Arc::new(RateCache::new())));
        Aggregator::new(resolver)
    }

    fn entry(code: &str, amount: Decimal) -> HashMap<String, Decimal> {
        HashMap::from([(code.to_string(), amount)])
    }

    #[tokio::test]
    async fn test_empty_request_fails_fast() {
        let stub = StubProvider::new();
        let aggregator = aggregator_with(stub.clone());

        let err = aggregator.bulk_convert("USD", &[], None).await.unwrap_err();

        assert!(matches!(err, RateError::EmptyRequest));
        assert_eq!(stub.calls(), 0);
    }

    #[tokio::test]
    async fn test_one_lookup_per_distinct_currency() {
        let stub = StubProvider::new();
        let aggregator = aggregator_with(stub.clone());

        let conversions = vec![
            entry("EUR", dec!(100)),
            entry("EUR", dec!(200)),
            entry("GBP", dec!(50)),
        ];
        let converted = aggregator
            .bulk_convert("USD", &conversions, None)
            .await
            .unwrap();

        assert_eq!(stub.calls(), 2);
        assert_eq!(converted.get("EUR_100"), Some(&dec!(92.00)));
        assert_eq!(converted.get("EUR_200"), Some(&dec!(184.00)));
        assert_eq!(converted.get("GBP_50"), Some(&dec!(39.50)));
    }

    #[tokio::test]
    async fn test_failed_currency_is_omitted() {
        let aggregator = aggregator_with(StubProvider::new());

        let conversions = vec![entry("EUR", dec!(100)), entry("ZZZ", dec!(10))];
        let converted = aggregator
            .bulk_convert("USD", &conversions, None)
            .await
            .unwrap();

        assert_eq!(converted.len(), 1);
        assert!(converted.contains_key("EUR_100"));
    }

    #[tokio::test]
    async fn test_duplicate_entries_collapse() {
        let aggregator = aggregator_with(StubProvider::new());

        let conversions = vec![entry("EUR", dec!(100)), entry("EUR", dec!(100))];
        let converted = aggregator
            .bulk_convert("USD", &conversions, None)
            .await
            .unwrap();

        assert_eq!(converted.len(), 1);
    }

    #[tokio::test]
    async fn test_compare_keeps_one_entry_per_currency() {
        let aggregator = aggregator_with(StubProvider::new());

        let targets = vec!["EUR".to_string(), "ZZZ".to_string()];
        let comparison = aggregator.compare("USD", &targets, None).await;

        assert_eq!(comparison.len(), 2);
        assert_eq!(comparison.get("EUR"), Some(&CompareOutcome::Rate(dec!(0.92))));
        match comparison.get("ZZZ") {
            Some(CompareOutcome::Error(message)) => {
                assert!(message.starts_with("Error:"), "got: {message}");
            }
            other => panic!("expected error outcome, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_compare_lowercase_input() {
        let aggregator = aggregator_with(StubProvider::new());

        let targets = vec!["eur".to_string()];
        let comparison = aggregator.compare("usd", &targets, None).await;

        assert_eq!(comparison.get("EUR"), Some(&CompareOutcome::Rate(dec!(0.92))));
    }
}
