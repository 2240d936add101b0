//! Rate resolution orchestration.
//!
//! The resolver ties the pieces together: cache lookup, registry dispatch,
//! normalization, cache write-through, and the single-level fallback to the
//! default provider on transport failure. Fallback depth is exactly one -
//! no chained fallback across alternates, to bound latency and avoid loops.
//!
//! Only `get_latest` falls back; `get_historical` maps a transport failure
//! straight to `ServiceUnavailable`. The asymmetry is deliberate and
//! preserved as observed behavior.

use std::sync::{Arc, RwLock};

use chrono::{NaiveDate, Utc};
use log::{debug, warn};

use crate::cache::{self, CachedValue, EntryClass, RateCache};
use crate::currencies;
use crate::errors::{RateError, Result};
use crate::models::{normalize_code, CurrencyList, RateResult};
use crate::registry::ProviderRegistry;

/// In-process currency list copy with its refresh day.
struct CurrencyListSlot {
    list: Arc<CurrencyList>,
    refreshed_on: NaiveDate,
}

/// Orchestrates rate lookups across cache, registry and providers.
pub struct RateResolver {
    registry: Arc<ProviderRegistry>,
    cache: Arc<RateCache>,
    // Daily staleness gate layered above the generic 24h cache entry.
    currency_list: RwLock<Option<CurrencyListSlot>>,
}

impl RateResolver {
    /// Create a resolver over the given registry and cache.
    pub fn new(registry: Arc<ProviderRegistry>, cache: Arc<RateCache>) -> Self {
        Self {
            registry,
            cache,
            currency_list: RwLock::new(None),
        }
    }

    /// Get the latest rate for `base` -> `target` from the requested
    /// provider, or the default provider when none is requested.
    ///
    /// Cached results are served within the rate TTL. On a transport
    /// failure the default provider is substituted exactly once; a
    /// transport failure at the default provider fails
    /// `ServiceUnavailable`. Semantic errors (`UpstreamRejected`,
    /// `RateUnavailable`, `UnknownProvider`) never trigger fallback.
    pub async fn get_latest(
        &self,
        base: &str,
        target: &str,
        provider: Option<&str>,
    ) -> Result<RateResult> {
        let base = normalize_code(base)?;
        let target = normalize_code(target)?;
        let requested = self.registry.resolve_id(provider);

        match self.latest_from(&base, &target, requested).await {
            Err(RateError::Transport { message, .. })
                if requested != self.registry.default_id() =>
            {
                let default_id = self.registry.default_id();
                warn!(
                    "provider '{}' unreachable ({}), falling back to '{}'",
                    requested, message, default_id
                );
                match self.latest_from(&base, &target, default_id).await {
                    Err(RateError::Transport { message, .. }) => {
                        Err(RateError::ServiceUnavailable { message })
                    }
                    other => other,
                }
            }
            Err(RateError::Transport { message, .. }) => {
                Err(RateError::ServiceUnavailable { message })
            }
            other => other,
        }
    }

    /// Single latest-rate attempt against one provider, read-through cached.
    async fn latest_from(&self, base: &str, target: &str, provider_id: &str) -> Result<RateResult> {
        let key = cache::latest_key(base, target, provider_id);
        if let Some(CachedValue::Rate(hit)) = self.cache.get(&key) {
            debug!("cache hit for {}", key);
            return Ok(hit);
        }

        let provider = self.registry.get(provider_id)?;
        let result = provider.fetch_latest(base, target).await?;
        self.cache
            .put(key, CachedValue::Rate(result.clone()), EntryClass::Rate);
        Ok(result)
    }

    /// Get the rate for `base` -> `target` as of `date` (`YYYY-MM-DD`).
    ///
    /// The date is validated before any cache or network activity. When the
    /// provider has no historical coverage the request transparently
    /// delegates to [`get_latest`](Self::get_latest) and the date is
    /// dropped. Transport failures propagate as `ServiceUnavailable`
    /// without fallback.
    pub async fn get_historical(
        &self,
        base: &str,
        target: &str,
        date: &str,
        provider: Option<&str>,
    ) -> Result<RateResult> {
        let parsed = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|_| RateError::InvalidDate(date.to_string()))?;
        let base = normalize_code(base)?;
        let target = normalize_code(target)?;
        let provider_id = self.registry.resolve_id(provider);

        let descriptor = self.registry.describe(provider_id)?;
        if !descriptor.supports_historical {
            debug!(
                "provider '{}' has no historical coverage, serving latest",
                provider_id
            );
            return self.get_latest(&base, &target, Some(provider_id)).await;
        }

        let key = cache::historical_key(&base, &target, parsed, provider_id);
        if let Some(CachedValue::Rate(hit)) = self.cache.get(&key) {
            debug!("cache hit for {}", key);
            return Ok(hit);
        }

        let provider = self.registry.get(provider_id)?;
        match provider.fetch_historical(&base, &target, parsed).await {
            Ok(result) => {
                self.cache
                    .put(key, CachedValue::Rate(result.clone()), EntryClass::Rate);
                Ok(result)
            }
            Err(RateError::Transport { message, .. }) => {
                Err(RateError::ServiceUnavailable { message })
            }
            Err(e) => Err(e),
        }
    }

    /// Get the supported currency list.
    ///
    /// The in-process copy is served when it was refreshed on the current
    /// calendar date; otherwise the 24h cache entry is adopted, and failing
    /// that the static table is produced and stored in both places. Two
    /// same-day calls return the identical shared object.
    pub async fn get_currency_list(&self) -> Arc<CurrencyList> {
        let today = Utc::now().date_naive();

        {
            let slot = self.currency_list.read().unwrap_or_else(|e| e.into_inner());
            if let Some(slot) = slot.as_ref() {
                if slot.refreshed_on == today {
                    return slot.list.clone();
                }
            }
        }

        if let Some(CachedValue::Currencies(list)) = self.cache.get(cache::CURRENCY_LIST_KEY) {
            self.store_currency_list(list.clone(), today);
            return list;
        }

        let list = Arc::new(currencies::default_currencies());
        self.cache.put(
            cache::CURRENCY_LIST_KEY,
            CachedValue::Currencies(list.clone()),
            EntryClass::Currencies,
        );
        self.store_currency_list(list.clone(), today);
        list
    }

    fn store_currency_list(&self, list: Arc<CurrencyList>, refreshed_on: NaiveDate) {
        let mut slot = self
            .currency_list
            .write()
            .unwrap_or_else(|e| e.into_inner());
        *slot = Some(CurrencyListSlot { list, refreshed_on });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AsOf, ProviderDescriptor};
    use crate::provider::RateProvider;
    use async_trait::async_trait;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Provider stub: fixed rates or a scripted transport failure, with a
    /// call counter so tests can assert how often the upstream was hit.
    struct StubProvider {
        id: &'static str,
        supports_historical: bool,
        rates: HashMap<String, Decimal>,
        fail_transport: bool,
        calls: AtomicUsize,
    }

    impl StubProvider {
        fn healthy(id: &'static str) -> Arc<Self> {
            Arc::new(Self {
                id,
                supports_historical: true,
                rates: HashMap::from([
                    ("EUR".to_string(), dec!(0.92)),
                    ("GBP".to_string(), dec!(0.79)),
                ]),
                fail_transport: false,
                calls: AtomicUsize::new(0),
            })
        }

        fn unreachable(id: &'static str) -> Arc<Self> {
            Arc::new(Self {
                id,
                supports_historical: true,
                rates: HashMap::new(),
                fail_transport: true,
                calls: AtomicUsize::new(0),
            })
        }

        fn latest_only(id: &'static str) -> Arc<Self> {
            Arc::new(Self {
                id,
                supports_historical: false,
                rates: HashMap::from([("EUR".to_string(), dec!(0.92))]),
                fail_transport: false,
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn lookup(&self, base: &str, target: &str) -> Result<RateResult> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_transport {
                return Err(RateError::Transport {
                    provider: self.id.to_string(),
                    message: "connection refused".to_string(),
                });
            }
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

    #[async_trait]
    impl RateProvider for StubProvider {
        fn id(&self) -> &'static str {
            self.id
        }

        fn descriptor(&self) -> ProviderDescriptor {
            ProviderDescriptor {
                id: self.id,
                display_name: "Stub",
                latest_endpoint: "http://stub/latest",
                historical_endpoint: "http://stub/historical",
                requires_credential: false,
                supports_historical: self.supports_historical,
            }
        }

        async fn fetch_latest(&self, base: &str, target: &str) -> Result<RateResult> {
            self.lookup(base, target)
        }

        async fn fetch_historical(
            &self,
            base: &str,
            target: &str,
            date: NaiveDate,
        ) -> Result<RateResult> {
            let result = self.lookup(base, target)?;
            Ok(RateResult::historical(result.base, result.rates, date))
        }
    }

    fn resolver_with(providers: Vec<Arc<StubProvider>>) -> RateResolver {
        let providers = providers
            .into_iter()
            .map(|p| p as Arc<dyn RateProvider>)
            .collect();
        let registry = Arc::new(ProviderRegistry::new(providers, "frankfurter"));
        RateResolver::new(registry, Arc::new(RateCache::new()))
    }

    #[tokio::test]
    async fn test_second_call_within_ttl_is_served_from_cache() {
        let stub = StubProvider::healthy("frankfurter");
        let resolver = resolver_with(vec![stub.clone()]);

        let first = resolver.get_latest("usd", "eur", None).await.unwrap();
        let second = resolver.get_latest("USD", "EUR", None).await.unwrap();

        assert_eq!(stub.calls(), 1);
        assert_eq!(first.rate_for("EUR"), second.rate_for("EUR"));
    }

    #[tokio::test]
    async fn test_expired_entry_triggers_fresh_fetch() {
        let stub = StubProvider::healthy("frankfurter");
        let resolver = resolver_with(vec![stub.clone()]);

        resolver.get_latest("USD", "EUR", None).await.unwrap();
        assert_eq!(stub.calls(), 1);

        resolver
            .cache
            .force_expire(&cache::latest_key("USD", "EUR", "frankfurter"));

        resolver.get_latest("USD", "EUR", None).await.unwrap();
        assert_eq!(stub.calls(), 2);
    }

    #[tokio::test]
    async fn test_different_providers_are_not_conflated() {
        let frankfurter = StubProvider::healthy("frankfurter");
        let other = StubProvider::healthy("currency_api");
        let resolver = resolver_with(vec![frankfurter.clone(), other.clone()]);

        resolver.get_latest("USD", "EUR", None).await.unwrap();
        resolver
            .get_latest("USD", "EUR", Some("currency_api"))
            .await
            .unwrap();

        assert_eq!(frankfurter.calls(), 1);
        assert_eq!(other.calls(), 1);
    }

    #[tokio::test]
    async fn test_transport_failure_falls_back_to_default_once() {
        let flaky = StubProvider::unreachable("currency_api");
        let default = StubProvider::healthy("frankfurter");
        let resolver = resolver_with(vec![flaky.clone(), default.clone()]);

        let result = resolver
            .get_latest("USD", "EUR", Some("currency_api"))
            .await
            .unwrap();

        assert_eq!(flaky.calls(), 1);
        assert_eq!(default.calls(), 1);
        assert_eq!(result.rate_for("EUR"), Some(dec!(0.92)));
    }

    #[tokio::test]
    async fn test_transport_failure_on_default_has_no_fallback() {
        let flaky = StubProvider::unreachable("frankfurter");
        let other = StubProvider::healthy("currency_api");
        let resolver = resolver_with(vec![flaky.clone(), other.clone()]);

        let err = resolver.get_latest("USD", "EUR", None).await.unwrap_err();

        assert!(matches!(err, RateError::ServiceUnavailable { .. }));
        assert_eq!(flaky.calls(), 1);
        assert_eq!(other.calls(), 0);
    }

    #[tokio::test]
    async fn test_semantic_error_does_not_fall_back() {
        let rejecting = StubProvider::healthy("currency_api");
        let default = StubProvider::healthy("frankfurter");
        let resolver = resolver_with(vec![rejecting.clone(), default.clone()]);

        let err = resolver
            .get_latest("USD", "ZZZ", Some("currency_api"))
            .await
            .unwrap_err();

        assert!(matches!(err, RateError::RateUnavailable { .. }));
        assert_eq!(default.calls(), 0);
    }

    #[tokio::test]
    async fn test_unknown_provider() {
        let resolver = resolver_with(vec![StubProvider::healthy("frankfurter")]);
        let err = resolver
            .get_latest("USD", "EUR", Some("nope"))
            .await
            .unwrap_err();
        assert!(matches!(err, RateError::UnknownProvider(id) if id == "nope"));
    }

    #[tokio::test]
    async fn test_invalid_date_fails_before_any_dispatch() {
        let stub = StubProvider::healthy("frankfurter");
        let resolver = resolver_with(vec![stub.clone()]);

        let err = resolver
            .get_historical("USD", "EUR", "2024-13-40", None)
            .await
            .unwrap_err();

        assert!(matches!(err, RateError::InvalidDate(_)));
        assert_eq!(stub.calls(), 0);
    }

    #[tokio::test]
    async fn test_historical_lookup_is_cached() {
        let stub = StubProvider::healthy("frankfurter");
        let resolver = resolver_with(vec![stub.clone()]);

        let first = resolver
            .get_historical("USD", "EUR", "2024-01-15", None)
            .await
            .unwrap();
        resolver
            .get_historical("USD", "EUR", "2024-01-15", None)
            .await
            .unwrap();

        assert_eq!(stub.calls(), 1);
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        assert_eq!(first.as_of, AsOf::Date(date));
    }

    #[tokio::test]
    async fn test_historical_without_coverage_serves_latest() {
        let stub = StubProvider::latest_only("frankfurter");
        let resolver = resolver_with(vec![stub.clone()]);

        let result = resolver
            .get_historical("USD", "EUR", "2024-01-15", None)
            .await
            .unwrap();

        // Latest-rate substitution: the date is dropped.
        assert!(matches!(result.as_of, AsOf::Timestamp(_)));
        assert_eq!(stub.calls(), 1);
    }

    #[tokio::test]
    async fn test_historical_transport_failure_is_service_unavailable() {
        let flaky = StubProvider::unreachable("currency_api");
        let default = StubProvider::healthy("frankfurter");
        let resolver = resolver_with(vec![flaky.clone(), default.clone()]);

        let err = resolver
            .get_historical("USD", "EUR", "2024-01-15", Some("currency_api"))
            .await
            .unwrap_err();

        // No fallback for historical lookups.
        assert!(matches!(err, RateError::ServiceUnavailable { .. }));
        assert_eq!(default.calls(), 0);
    }

    #[tokio::test]
    async fn test_currency_list_is_shared_within_the_day() {
        let resolver = resolver_with(vec![StubProvider::healthy("frankfurter")]);

        let first = resolver.get_currency_list().await;
        let second = resolver.get_currency_list().await;

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.len(), 28);
    }
}
