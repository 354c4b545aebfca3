//! Error types for the market data crate.
//!
//! [`MarketDataError`] is what provider calls return internally. The public
//! adapter entry points ([`QuoteProvider`](crate::provider::QuoteProvider) and
//! [`HistoryProvider`](crate::provider::HistoryProvider)) never surface it;
//! they convert it into an unavailable field or an empty series.

use thiserror::Error;

/// Errors that can occur while talking to a market data provider.
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// The requested symbol was not found by the provider.
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    /// The provider rate limited the request (HTTP 429 or an API note).
    #[error("Rate limited: {provider}")]
    RateLimited {
        /// The provider that rate limited the request
        provider: String,
    },

    /// The request to the provider timed out.
    #[error("Timeout: {provider}")]
    Timeout {
        /// The provider that timed out
        provider: String,
    },

    /// A provider-specific error occurred.
    #[error("Provider error: {provider} - {message}")]
    ProviderError {
        /// The provider that returned the error
        provider: String,
        /// The error message from the provider
        message: String,
    },

    /// The provider returned data we could not use.
    #[error("Validation failed: {message}")]
    ValidationFailed {
        /// Description of the validation failure
        message: String,
    },

    /// A network error occurred while communicating with a provider.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl MarketDataError {
    /// Build a [`MarketDataError::ProviderError`] for the given provider.
    pub fn provider(provider: &str, message: impl Into<String>) -> Self {
        Self::ProviderError {
            provider: provider.to_string(),
            message: message.into(),
        }
    }

    /// Map a transport error, keeping timeouts distinguishable.
    pub fn from_transport(provider: &str, error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout {
                provider: provider.to_string(),
            }
        } else {
            Self::Network(error)
        }
    }

    /// Whether the provider asked us to slow down.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = MarketDataError::SymbolNotFound("INVALID".to_string());
        assert_eq!(format!("{}", error), "Symbol not found: INVALID");

        let error = MarketDataError::RateLimited {
            provider: "ALPHA_VANTAGE".to_string(),
        };
        assert_eq!(format!("{}", error), "Rate limited: ALPHA_VANTAGE");

        let error = MarketDataError::provider("YAHOO", "Yahoo authentication expired");
        assert_eq!(
            format!("{}", error),
            "Provider error: YAHOO - Yahoo authentication expired"
        );
    }

    #[test]
    fn test_timeout_display() {
        let error = MarketDataError::Timeout {
            provider: "YAHOO".to_string(),
        };
        assert_eq!(format!("{}", error), "Timeout: YAHOO");
        assert!(!error.is_rate_limited());
    }

    #[tokio::test]
    async fn test_refused_connection_is_network_error() {
        let client = reqwest::Client::new();
        let error = client
            .get("http://127.0.0.1:9/")
            .send()
            .await
            .unwrap_err();

        let error = MarketDataError::from_transport("ALPHA_VANTAGE", error);
        assert!(matches!(error, MarketDataError::Network(_)));
        assert!(format!("{}", error).starts_with("Network error: "));
    }

    #[test]
    fn test_rate_limited_flag() {
        let error = MarketDataError::RateLimited {
            provider: "ALPHA_VANTAGE".to_string(),
        };
        assert!(error.is_rate_limited());
    }
}
