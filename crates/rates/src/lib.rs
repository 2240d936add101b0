//! Ratehub Rates Crate
//!
//! This crate provides provider-agnostic exchange rate aggregation for the
//! Ratehub service.
//!
//! # Overview
//!
//! The rates crate supports:
//! - Multiple upstream providers: ExchangeRate-API, Frankfurter, CurrencyAPI
//! - Latest and historical rate lookups with short-lived response caching
//! - Single-level fallback to the default provider on transport failure
//! - Bulk conversion and multi-currency comparison with per-item isolation
//!
//! # Architecture
//!
//! ```text
//! +------------------+     +------------------+
//! |    Aggregator    | --> |   RateResolver   |  (cache / dispatch / fallback)
//! +------------------+     +------------------+
//!                                  |
//!                    +-------------+-------------+
//!                    v                           v
//!           +------------------+       +------------------+
//!           |     RateCache    |       | ProviderRegistry |
//!           +------------------+       +------------------+
//!                                               |
//!                                               v
//!                                      +------------------+
//!                                      |   RateProvider   |  (Frankfurter, ...)
//!                                      +------------------+
//!                                               |
//!                                               v
//!                                      +------------------+
//!                                      |    RateResult    |  (normalized)
//!                                      +------------------+
//! ```
//!
//! # Core Types
//!
//! - [`RateResult`] - Normalized rate lookup result (base, rates, as-of marker)
//! - [`ProviderDescriptor`] - Static description of an upstream provider
//! - [`CurrencyList`] - Code-to-display-name currency table
//! - [`RateError`] - Error taxonomy shared with the routing layer

pub mod aggregator;
pub mod cache;
pub mod currencies;
pub mod errors;
pub mod models;
pub mod provider;
pub mod registry;
pub mod resolver;

// Re-export all public types from models
pub use models::{normalize_code, AsOf, CurrencyList, ProviderDescriptor, RateResult};

// Re-export error types
pub use errors::{RateError, Result};

// Re-export provider types
pub use provider::{
    CurrencyApiProvider, ExchangeRateApiProvider, FrankfurterProvider, RateProvider,
};

// Re-export orchestration types
pub use aggregator::{Aggregator, CompareOutcome};
pub use cache::{CachedValue, EntryClass, RateCache};
pub use currencies::default_currencies;
pub use registry::ProviderRegistry;
pub use resolver::RateResolver;
