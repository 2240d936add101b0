//! Provider registry: id-to-provider lookup and default-provider selection.
//!
//! Pure lookup, no I/O. An unregistered id fails with `UnknownProvider`,
//! which propagates to the caller as a client error and is never retried.

use std::collections::HashMap;
use std::sync::Arc;

use crate::errors::{RateError, Result};
use crate::models::ProviderDescriptor;
use crate::provider::{
    CurrencyApiProvider, ExchangeRateApiProvider, FrankfurterProvider, RateProvider,
};

/// The provider substituted after a transport failure on `get_latest`.
pub const DEFAULT_PROVIDER: &str = "frankfurter";

/// Registry of configured rate providers.
pub struct ProviderRegistry {
    providers: HashMap<&'static str, Arc<dyn RateProvider>>,
    default_id: &'static str,
}

impl ProviderRegistry {
    /// Create a registry from the given providers.
    ///
    /// `default_id` names the fallback provider and should be one of the
    /// registered ids; lookups against it fail like any other unknown id
    /// otherwise.
    pub fn new(providers: Vec<Arc<dyn RateProvider>>, default_id: &'static str) -> Self {
        let providers = providers.into_iter().map(|p| (p.id(), p)).collect();
        Self {
            providers,
            default_id,
        }
    }

    /// Build the standard three-provider registry with Frankfurter as the
    /// default. The CurrencyAPI credential comes from configuration.
    pub fn with_default_providers(currency_api_key: String) -> Self {
        Self::new(
            vec![
                Arc::new(ExchangeRateApiProvider::new()),
                Arc::new(FrankfurterProvider::new()),
                Arc::new(CurrencyApiProvider::new(currency_api_key)),
            ],
            DEFAULT_PROVIDER,
        )
    }

    /// Id of the default (fallback) provider.
    pub fn default_id(&self) -> &'static str {
        self.default_id
    }

    /// Resolve an optional caller-supplied provider id to a concrete one.
    pub fn resolve_id<'a>(&self, requested: Option<&'a str>) -> &'a str {
        requested.unwrap_or(self.default_id)
    }

    /// Look up a provider handle by id.
    pub fn get(&self, id: &str) -> Result<Arc<dyn RateProvider>> {
        self.providers
            .get(id)
            .cloned()
            .ok_or_else(|| RateError::UnknownProvider(id.to_string()))
    }

    /// Look up a provider descriptor by id.
    pub fn describe(&self, id: &str) -> Result<ProviderDescriptor> {
        Ok(self.get(id)?.descriptor())
    }

    /// Descriptors of all registered providers, ordered by id.
    pub fn descriptors(&self) -> Vec<ProviderDescriptor> {
        let mut descriptors: Vec<ProviderDescriptor> =
            self.providers.values().map(|p| p.descriptor()).collect();
        descriptors.sort_by_key(|d| d.id);
        descriptors
    }
}
