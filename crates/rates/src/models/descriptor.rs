//! Static provider descriptions.

use serde::Serialize;

/// Static description of an upstream provider.
///
/// Built once per provider at construction and never mutated. The `id` is
/// the dispatch discriminator and part of every rate cache key, so results
/// from different providers are never conflated.
#[derive(Debug, Clone, Serialize)]
pub struct ProviderDescriptor {
    /// Unique short identifier, e.g. "frankfurter".
    pub id: &'static str,
    /// Human label, e.g. "Frankfurter".
    pub display_name: &'static str,
    /// URL template for latest-rate requests.
    pub latest_endpoint: &'static str,
    /// URL template for historical requests.
    pub historical_endpoint: &'static str,
    /// Whether a credential must be present at dispatch time.
    pub requires_credential: bool,
    /// Whether historical queries are supported. When false, historical
    /// requests transparently substitute the latest-rate operation.
    pub supports_historical: bool,
}
