//! Data models for the rates crate.

mod currency;
mod descriptor;
mod rate;

pub use currency::{normalize_code, CurrencyList};
pub use descriptor::ProviderDescriptor;
pub use rate::{AsOf, RateResult};
