//! Error types for the rates crate.
//!
//! Every failure surfaced to the routing layer is one of the variants below;
//! the routing layer maps them to transport-level status codes.

use thiserror::Error;

/// Type alias for Result using our error type.
pub type Result<T> = std::result::Result<T, RateError>;

/// Errors that can occur during rate operations.
#[derive(Error, Debug)]
pub enum RateError {
    /// Malformed input, detected before any I/O.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The requested provider id is not registered.
    /// This is a terminal error - never retried, never falls back.
    #[error("Invalid provider: {0}")]
    UnknownProvider(String),

    /// The historical date is not a well-formed calendar date.
    #[error("Invalid date '{0}'. Use YYYY-MM-DD")]
    InvalidDate(String),

    /// The target currency is missing or non-positive in a well-formed
    /// upstream payload.
    #[error("Target currency {currency} not supported")]
    RateUnavailable {
        /// The currency that could not be resolved
        currency: String,
    },

    /// The upstream payload self-reports an error, or could not be decoded.
    /// Semantic failure: no fallback.
    #[error("API error from {provider}: {message}")]
    UpstreamRejected {
        /// The provider that rejected the request
        provider: String,
        /// The error message from the provider payload
        message: String,
    },

    /// Connection, timeout or DNS failure while contacting a provider.
    /// Never crosses the resolver boundary: the resolver converts it to
    /// [`RateError::ServiceUnavailable`] once the fallback decision is made.
    #[error("Transport failure contacting {provider}: {message}")]
    Transport {
        /// The provider that was unreachable
        provider: String,
        /// Description of the transport failure
        message: String,
    },

    /// Transport failure after exhausting the single-level fallback.
    #[error("Exchange rate service unavailable: {message}")]
    ServiceUnavailable {
        /// Description of the underlying failure
        message: String,
    },

    /// A bulk operation was invoked with no entries.
    #[error("No conversions provided")]
    EmptyRequest,
}

impl RateError {
    /// Build a transport error from a reqwest failure.
    pub fn transport(provider: &str, err: &reqwest::Error) -> Self {
        RateError::Transport {
            provider: provider.to_string(),
            message: err.to_string(),
        }
    }

    /// Build an upstream rejection with the given message.
    pub fn rejected(provider: &str, message: impl Into<String>) -> Self {
        RateError::UpstreamRejected {
            provider: provider.to_string(),
            message: message.into(),
        }
    }

    /// Whether this error is a transport-level failure (fallback candidate).
    pub fn is_transport(&self) -> bool {
        matches!(self, RateError::Transport { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_transport() {
        let err = RateError::Transport {
            provider: "frankfurter".to_string(),
            message: "connection refused".to_string(),
        };
        assert!(err.is_transport());
        assert!(!RateError::EmptyRequest.is_transport());
        assert!(!RateError::UnknownProvider("nope".to_string()).is_transport());
    }

    #[test]
    fn test_display_messages() {
        let err = RateError::InvalidDate("2024-13-40".to_string());
        assert_eq!(err.to_string(), "Invalid date '2024-13-40'. Use YYYY-MM-DD");

        let err = RateError::RateUnavailable {
            currency: "ZZZ".to_string(),
        };
        assert_eq!(err.to_string(), "Target currency ZZZ not supported");
    }
}
