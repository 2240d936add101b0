//! Static table of supported currencies.
//!
//! The list is a fixed table rather than a provider-backed lookup; the
//! resolver structure allows a future provider-backed refresh without
//! changing callers.

use lazy_static::lazy_static;

use crate::models::CurrencyList;

lazy_static! {
    static ref DEFAULT_CURRENCIES: CurrencyList = CurrencyList::from_pairs(&[
        ("USD", "United States Dollar"),
        ("EUR", "Euro"),
        ("GBP", "British Pound Sterling"),
        ("JPY", "Japanese Yen"),
        ("CAD", "Canadian Dollar"),
        ("AUD", "Australian Dollar"),
        ("CHF", "Swiss Franc"),
        ("CNY", "Chinese Yuan"),
        ("INR", "Indian Rupee"),
        ("BRL", "Brazilian Real"),
        ("RUB", "Russian Ruble"),
        ("MXN", "Mexican Peso"),
        ("SGD", "Singapore Dollar"),
        ("HKD", "Hong Kong Dollar"),
        ("NZD", "New Zealand Dollar"),
        ("KRW", "South Korean Won"),
        ("TRY", "Turkish Lira"),
        ("ZAR", "South African Rand"),
        ("SEK", "Swedish Krona"),
        ("NOK", "Norwegian Krone"),
        ("DKK", "Danish Krone"),
        ("PLN", "Polish Zloty"),
        ("THB", "Thai Baht"),
        ("IDR", "Indonesian Rupiah"),
        ("MYR", "Malaysian Ringgit"),
        ("PHP", "Philippine Peso"),
        ("CZK", "Czech Koruna"),
        ("HUF", "Hungarian Forint"),
    ]);
}

/// The fixed set of supported currencies.
pub fn default_currencies() -> CurrencyList {
    DEFAULT_CURRENCIES.clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_currencies() {
        let list = default_currencies();
        assert_eq!(list.len(), 28);
        assert_eq!(list.name_of("USD"), Some("United States Dollar"));
        assert_eq!(list.name_of("HUF"), Some("Hungarian Forint"));
        assert_eq!(list.name_of("ZZZ"), None);
    }
}
