//! Rate provider trait definition.
//!
//! This module defines the core `RateProvider` trait that all upstream
//! exchange-rate providers must implement.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::errors::Result;
use crate::models::{ProviderDescriptor, RateResult};

/// Trait for exchange rate providers.
///
/// Implement this trait to add support for a new upstream rate source.
/// Implementations are responsible for building the provider-specific
/// request (including credential injection where required) and for
/// normalizing the raw payload into a [`RateResult`]. Transport failures
/// must surface as [`RateError::Transport`](crate::errors::RateError::Transport)
/// so the resolver can apply its fallback rule; payload-level errors must
/// surface as `UpstreamRejected` or `RateUnavailable`.
#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Unique identifier for this provider.
    ///
    /// Used as the dispatch discriminator and as part of every cache key.
    fn id(&self) -> &'static str;

    /// Static description of this provider.
    fn descriptor(&self) -> ProviderDescriptor;

    /// Fetch the latest rate for `base` -> `target`.
    ///
    /// Both codes are upper-cased 3-letter codes, pre-normalized by the
    /// resolver.
    async fn fetch_latest(&self, base: &str, target: &str) -> Result<RateResult>;

    /// Fetch the rate for `base` -> `target` as of `date`.
    ///
    /// Providers without historical coverage serve the latest rate instead;
    /// the resolver additionally short-circuits to the latest-rate path
    /// (with its date-less cache key) when the descriptor reports
    /// `supports_historical: false`.
    async fn fetch_historical(
        &self,
        base: &str,
        target: &str,
        date: NaiveDate,
    ) -> Result<RateResult> {
        let _ = date;
        self.fetch_latest(base, target).await
    }
}
