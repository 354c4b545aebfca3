//! Market data provider trait definitions.

use async_trait::async_trait;

use crate::errors::MarketDataError;
use crate::models::{Bar, HistorySeries, HistoryWindow, QuoteSnapshot, QuoteSummary};

/// Raw quote lookups against a single provider.
///
/// Implement this trait to plug a new quote backend into
/// [`QuoteResolver`](crate::resolver::QuoteResolver).
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use tickerboard_market_data::provider::QuoteSource;
///
/// struct MyProvider;
///
/// #[async_trait]
/// impl QuoteSource for MyProvider {
///     fn id(&self) -> &'static str {
///         "MY_PROVIDER"
///     }
///
///     // ... implement quote_summary and price_history
/// }
/// ```
#[async_trait]
pub trait QuoteSource: Send + Sync {
    /// Unique identifier for this provider, used in logs.
    fn id(&self) -> &'static str;

    /// Fetch the direct quote fields for a symbol.
    async fn quote_summary(&self, symbol: &str) -> Result<QuoteSummary, MarketDataError>;

    /// Fetch price bars for a symbol over a chart window, oldest first.
    async fn price_history(
        &self,
        symbol: &str,
        window: HistoryWindow,
    ) -> Result<Vec<Bar>, MarketDataError>;
}

/// Resolves a full quote snapshot for a ticker.
///
/// Implementations never fail: anything that cannot be resolved is reported
/// as an unavailable field on the snapshot.
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    async fn snapshot(&self, symbol: &str) -> QuoteSnapshot;
}

/// Fetches recent daily closes for a ticker.
///
/// Implementations never fail: rate limiting, timeouts and malformed
/// responses all yield an empty series.
#[async_trait]
pub trait HistoryProvider: Send + Sync {
    async fn daily_history(&self, symbol: &str) -> HistorySeries;
}
