//! Server configuration from environment variables.

/// Runtime configuration for the server process.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP listener binds to.
    pub listen_addr: String,
    /// CurrencyAPI credential, injected into provider requests as a query
    /// parameter. Never logged.
    pub currency_api_key: String,
}

impl Config {
    /// Read configuration from the environment, with defaults matching the
    /// development setup.
    pub fn from_env() -> Self {
        Self {
            listen_addr: std::env::var("RATEHUB_LISTEN_ADDR")
                .unwrap_or_else(|_| "0.0.0.0:8000".to_string()),
            currency_api_key: std::env::var("CURRENCY_API_KEY").unwrap_or_default(),
        }
    }
}
