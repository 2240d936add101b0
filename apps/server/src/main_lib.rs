use std::sync::Arc;

use ratehub_rates::{Aggregator, ProviderRegistry, RateCache, RateResolver};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::Config;

/// Shared state handed to every request handler.
pub struct AppState {
    pub registry: Arc<ProviderRegistry>,
    pub resolver: Arc<RateResolver>,
    pub aggregator: Aggregator,
}

impl AppState {
    /// Wire the core components over a given registry. Used directly by
    /// tests to inject stub providers.
    pub fn with_registry(registry: Arc<ProviderRegistry>) -> Arc<Self> {
        let cache = Arc::new(RateCache::new());
        let resolver = Arc::new(RateResolver::new(registry.clone(), cache));
        let aggregator = Aggregator::new(resolver.clone());
        Arc::new(Self {
            registry,
            resolver,
            aggregator,
        })
    }
}

/// Initialize the tracing subscriber (fmt layer + `RUST_LOG` filter).
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .init();
}

/// Build the application state from configuration.
pub fn build_state(config: &Config) -> Arc<AppState> {
    let registry = Arc::new(ProviderRegistry::with_default_providers(
        config.currency_api_key.clone(),
    ));
    AppState::with_registry(registry)
}
