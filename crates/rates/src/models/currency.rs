//! Currency code normalization and the currency list shape.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::{RateError, Result};

/// Normalize a currency code to its canonical upper-cased 3-letter form.
///
/// Fails with `InvalidRequest` before any I/O when the code is not three
/// ASCII letters.
pub fn normalize_code(code: &str) -> Result<String> {
    let trimmed = code.trim();
    if trimmed.len() != 3 || !trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(RateError::InvalidRequest(format!(
            "currency code '{}' must be 3 letters",
            code
        )));
    }
    Ok(trimmed.to_ascii_uppercase())
}

/// Mapping from 3-letter currency code to display name.
///
/// Immutable for the process once built; refreshed at most once per calendar
/// day by the resolver.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurrencyList {
    entries: BTreeMap<String, String>,
}

impl CurrencyList {
    /// Build a currency list from code/name pairs.
    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        Self {
            entries: pairs
                .iter()
                .map(|(code, name)| (code.to_string(), name.to_string()))
                .collect(),
        }
    }

    /// Number of currencies in the list.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Display name for a currency code, if listed.
    pub fn name_of(&self, code: &str) -> Option<&str> {
        self.entries.get(code).map(String::as_str)
    }

    /// Code-to-name entries, ordered by code.
    pub fn entries(&self) -> &BTreeMap<String, String> {
        &self.entries
    }
}
