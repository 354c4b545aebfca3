//! Yahoo Finance quote provider.
//!
//! This provider uses two Yahoo Finance APIs:
//! - quoteSummary (crumb/cookie authenticated) for the direct quote fields
//! - the chart API, through `yahoo_finance_api`, for price history fallbacks

mod models;

use std::future::Future;
use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;
use lazy_static::lazy_static;
use num_traits::FromPrimitive;
use reqwest::{header, Client};
use rust_decimal::Decimal;
use tracing::{debug, warn};
use urlencoding::encode;
use yahoo_finance_api as yahoo;

use crate::errors::MarketDataError;
use crate::models::{Bar, HistoryWindow, QuoteSummary};
use crate::provider::QuoteSource;

use models::{raw, YahooQuoteSummaryResponse, YahooQuoteSummaryResult};

const PROVIDER_ID: &str = "YAHOO";
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

// ============================================================================
// Crumb/Cookie Authentication
// ============================================================================

/// Cached Yahoo authentication data
#[derive(Debug, Clone)]
struct CrumbData {
    cookie: String,
    crumb: String,
}

lazy_static! {
    /// Global cache for Yahoo authentication crumb
    static ref YAHOO_CRUMB: RwLock<Option<CrumbData>> = RwLock::default();
}

// ============================================================================
// Yahoo Provider
// ============================================================================

/// Yahoo Finance quote source.
pub struct YahooProvider {
    connector: yahoo::YahooConnector,
    client: Client,
    timeout: Duration,
}

impl YahooProvider {
    /// Create a new Yahoo Finance provider with the default 30 second timeout.
    pub fn new() -> Result<Self, MarketDataError> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Create a provider whose requests give up after `timeout`.
    pub fn with_timeout(timeout: Duration) -> Result<Self, MarketDataError> {
        let connector = yahoo::YahooConnector::new().map_err(|e| {
            MarketDataError::provider(
                PROVIDER_ID,
                format!("Failed to initialize Yahoo connector: {}", e),
            )
        })?;

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| MarketDataError::provider(PROVIDER_ID, e.to_string()))?;

        Ok(Self {
            connector,
            client,
            timeout,
        })
    }

    /// Run a connector call under the provider timeout.
    async fn bounded<T, E: std::fmt::Display>(
        &self,
        call: impl Future<Output = Result<T, E>>,
    ) -> Result<T, MarketDataError> {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result.map_err(|e| MarketDataError::provider(PROVIDER_ID, e.to_string())),
            Err(_) => Err(MarketDataError::Timeout {
                provider: PROVIDER_ID.to_string(),
            }),
        }
    }

    // ========================================================================
    // Crumb/Cookie Authentication
    // ========================================================================

    /// Ensure we have a valid Yahoo authentication crumb.
    async fn ensure_crumb(&self) -> Result<CrumbData, MarketDataError> {
        {
            let guard = YAHOO_CRUMB.read().unwrap_or_else(|p| p.into_inner());
            if let Some(crumb) = guard.as_ref() {
                return Ok(crumb.clone());
            }
        }

        self.fetch_crumb().await
    }

    /// Fetch a new Yahoo authentication crumb.
    async fn fetch_crumb(&self) -> Result<CrumbData, MarketDataError> {
        // Step 1: Get cookie from fc.yahoo.com
        let response = self
            .client
            .get("https://fc.yahoo.com")
            .send()
            .await
            .map_err(|e| MarketDataError::from_transport(PROVIDER_ID, e))?;

        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.split_once(';').map(|(v, _)| v.to_string()))
            .ok_or_else(|| MarketDataError::provider(PROVIDER_ID, "Failed to parse Yahoo cookie"))?;

        // Step 2: Get crumb using cookie
        let crumb = self
            .client
            .get("https://query1.finance.yahoo.com/v1/test/getcrumb")
            .header(header::USER_AGENT, USER_AGENT)
            .header(header::COOKIE, &cookie)
            .send()
            .await
            .map_err(|e| MarketDataError::from_transport(PROVIDER_ID, e))?
            .text()
            .await
            .map_err(|e| MarketDataError::from_transport(PROVIDER_ID, e))?;

        let crumb_data = CrumbData { cookie, crumb };

        let mut guard = YAHOO_CRUMB.write().unwrap_or_else(|p| p.into_inner());
        *guard = Some(crumb_data.clone());

        Ok(crumb_data)
    }

    /// Clear the cached crumb (used when authentication fails)
    fn clear_crumb(&self) {
        let mut guard = YAHOO_CRUMB.write().unwrap_or_else(|p| p.into_inner());
        *guard = None;
    }

    // ========================================================================
    // Conversions
    // ========================================================================

    /// Convert a chart quote into a bar, dropping rows with non-finite prices.
    fn yahoo_quote_to_bar(quote: &yahoo::Quote) -> Option<Bar> {
        Some(Bar {
            open: Decimal::from_f64(quote.open)?,
            high: Decimal::from_f64(quote.high)?,
            low: Decimal::from_f64(quote.low)?,
            close: Decimal::from_f64(quote.close)?,
            volume: quote.volume,
        })
    }

    /// Flatten a quoteSummary result into provider-neutral fields.
    fn map_quote_summary(result: &YahooQuoteSummaryResult) -> QuoteSummary {
        let price = result.price.as_ref();
        let detail = result.summary_detail.as_ref();
        let financial = result.financial_data.as_ref();
        let decimal = |v: Option<f64>| v.and_then(Decimal::from_f64);

        QuoteSummary {
            current_price: decimal(financial.and_then(|f| raw(&f.current_price))),
            regular_market_price: decimal(price.and_then(|p| raw(&p.regular_market_price))),
            open: decimal(detail.and_then(|d| raw(&d.open))),
            previous_close: decimal(detail.and_then(|d| raw(&d.previous_close))),
            volume: detail.and_then(|d| raw(&d.volume)).and_then(u64::from_f64),
            fifty_two_week_high: decimal(detail.and_then(|d| raw(&d.fifty_two_week_high))),
            fifty_two_week_low: decimal(detail.and_then(|d| raw(&d.fifty_two_week_low))),
            market_state: price.and_then(|p| p.market_state.clone()),
            long_name: price.and_then(|p| clean_name(p.long_name.as_deref())),
            short_name: price.and_then(|p| clean_name(p.short_name.as_deref())),
        }
    }

    // ========================================================================
    // Fetching
    // ========================================================================

    /// Fetch quote fields using the quoteSummary API.
    async fn fetch_quote_summary(&self, symbol: &str) -> Result<QuoteSummary, MarketDataError> {
        let crumb = self.ensure_crumb().await?;

        let url = format!(
            "https://query1.finance.yahoo.com/v10/finance/quoteSummary/{}?modules=price,summaryDetail,financialData&crumb={}",
            encode(symbol),
            encode(&crumb.crumb)
        );

        let response = self
            .client
            .get(&url)
            .header(header::USER_AGENT, USER_AGENT)
            .header(header::COOKIE, &crumb.cookie)
            .send()
            .await
            .map_err(|e| MarketDataError::from_transport(PROVIDER_ID, e))?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            self.clear_crumb();
            return Err(MarketDataError::provider(
                PROVIDER_ID,
                "Yahoo authentication expired",
            ));
        }

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(MarketDataError::RateLimited {
                provider: PROVIDER_ID.to_string(),
            });
        }

        let data: YahooQuoteSummaryResponse = response.json().await.map_err(|e| {
            MarketDataError::provider(
                PROVIDER_ID,
                format!("Failed to parse quote summary response: {}", e),
            )
        })?;

        if let Some(error) = data.quote_summary.error {
            warn!(
                "Yahoo quoteSummary error for {}: {}",
                symbol,
                error.description.unwrap_or_default()
            );
            return Err(MarketDataError::SymbolNotFound(symbol.to_string()));
        }

        let result = data
            .quote_summary
            .result
            .unwrap_or_default()
            .into_iter()
            .next()
            .ok_or_else(|| MarketDataError::SymbolNotFound(symbol.to_string()))?;

        Ok(Self::map_quote_summary(&result))
    }
}

// ============================================================================
// QuoteSource Implementation
// ============================================================================

#[async_trait]
impl QuoteSource for YahooProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn quote_summary(&self, symbol: &str) -> Result<QuoteSummary, MarketDataError> {
        debug!("Fetching quote summary for {} from Yahoo", symbol);
        self.fetch_quote_summary(symbol).await
    }

    async fn price_history(
        &self,
        symbol: &str,
        window: HistoryWindow,
    ) -> Result<Vec<Bar>, MarketDataError> {
        debug!(
            "Fetching {} history at {} for {} from Yahoo",
            window.range(),
            window.interval(),
            symbol
        );

        let response = self
            .bounded(
                self.connector
                    .get_quote_range(symbol, window.interval(), window.range()),
            )
            .await?;

        match response.quotes() {
            Ok(quotes) => Ok(quotes.iter().filter_map(Self::yahoo_quote_to_bar).collect()),
            Err(yahoo::YahooError::NoQuotes) => Ok(Vec::new()),
            Err(e) => Err(MarketDataError::provider(PROVIDER_ID, e.to_string())),
        }
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Decode HTML entities Yahoo leaves in names; blank names count as missing.
fn clean_name(name: Option<&str>) -> Option<String> {
    let name = name?.replace("&amp;", "&");
    let name = name.trim();
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_clean_name() {
        assert_eq!(
            clean_name(Some("Johnson &amp; Johnson")),
            Some("Johnson & Johnson".to_string())
        );
        assert_eq!(clean_name(Some("  Apple Inc. ")), Some("Apple Inc.".to_string()));
        assert_eq!(clean_name(Some("   ")), None);
        assert_eq!(clean_name(None), None);
    }

    #[test]
    fn test_map_quote_summary() {
        let json = r#"{
            "price": {
                "longName": "Apple Inc.",
                "shortName": "Apple",
                "marketState": "POST",
                "regularMarketPrice": {"raw": 150.0}
            },
            "summaryDetail": {
                "open": {"raw": 145.0},
                "previousClose": {"raw": 148.5},
                "volume": {"raw": 1200000},
                "fiftyTwoWeekHigh": {"raw": 199.62},
                "fiftyTwoWeekLow": {"raw": 124.17}
            },
            "financialData": {"currentPrice": {}}
        }"#;
        let result: YahooQuoteSummaryResult = serde_json::from_str(json).unwrap();
        let summary = YahooProvider::map_quote_summary(&result);

        assert_eq!(summary.current_price, None);
        assert_eq!(summary.regular_market_price, Some(dec!(150)));
        assert_eq!(summary.open, Some(dec!(145)));
        assert_eq!(summary.previous_close, Some(dec!(148.5)));
        assert_eq!(summary.volume, Some(1_200_000));
        assert_eq!(summary.fifty_two_week_high, Some(dec!(199.62)));
        assert_eq!(summary.fifty_two_week_low, Some(dec!(124.17)));
        assert_eq!(summary.market_state.as_deref(), Some("POST"));
        assert_eq!(summary.long_name.as_deref(), Some("Apple Inc."));
        assert_eq!(summary.short_name.as_deref(), Some("Apple"));
    }

    #[test]
    fn test_map_empty_quote_summary() {
        let result: YahooQuoteSummaryResult = serde_json::from_str("{}").unwrap();
        assert_eq!(YahooProvider::map_quote_summary(&result), QuoteSummary::default());
    }
}
