//! Alpha Vantage history provider implementation.
//!
//! This module provides recent daily closes from the Alpha Vantage
//! TIME_SERIES_DAILY endpoint (compact output, roughly 100 trading days).
//!
//! Note: Alpha Vantage free tier is limited to a handful of API calls per
//! minute. When the limit is hit the API still answers HTTP 200, but with a
//! `Note` or `Information` message instead of the time series.

use async_trait::async_trait;
use chrono::NaiveDate;
use log::{debug, warn};
use num_traits::FromPrimitive;
use reqwest::{Client, StatusCode};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;

use crate::errors::MarketDataError;
use crate::models::{HistoryPoint, HistorySeries, HISTORY_LIMIT};
use crate::provider::HistoryProvider;

const BASE_URL: &str = "https://www.alphavantage.co/query";
const PROVIDER_ID: &str = "ALPHA_VANTAGE";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Alpha Vantage daily history provider.
pub struct AlphaVantageProvider {
    client: Client,
    api_key: String,
    base_url: String,
    limit: usize,
}

// ============================================================================
// Response structures for Alpha Vantage API
// ============================================================================

/// TIME_SERIES_DAILY response.
///
/// Entries are kept as raw JSON so that one malformed day does not reject
/// the whole series.
#[derive(Debug, Deserialize)]
struct TimeSeriesResponse {
    #[serde(rename = "Time Series (Daily)")]
    time_series: Option<HashMap<String, serde_json::Value>>,
    #[serde(rename = "Error Message")]
    error_message: Option<String>,
    #[serde(rename = "Note")]
    note: Option<String>,
    #[serde(rename = "Information")]
    information: Option<String>,
}

// ============================================================================
// AlphaVantageProvider implementation
// ============================================================================

impl AlphaVantageProvider {
    /// Create a new Alpha Vantage provider with the given API key.
    pub fn new(api_key: String) -> Self {
        Self::with_timeout(api_key, DEFAULT_TIMEOUT)
    }

    /// Create a provider whose requests give up after `timeout`.
    pub fn with_timeout(api_key: String, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            api_key,
            base_url: BASE_URL.to_string(),
            limit: HISTORY_LIMIT,
        }
    }

    /// Point the provider at another query endpoint.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Make a request to the Alpha Vantage API.
    async fn fetch(&self, params: &[(&str, &str)]) -> Result<String, MarketDataError> {
        let mut all_params: Vec<(&str, &str)> = params.to_vec();
        all_params.push(("apikey", &self.api_key));

        let url = reqwest::Url::parse_with_params(&self.base_url, &all_params).map_err(|e| {
            MarketDataError::provider(PROVIDER_ID, format!("Failed to build URL: {}", e))
        })?;

        debug!("Alpha Vantage request: {}", Self::masked_url(&url));

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| MarketDataError::from_transport(PROVIDER_ID, e))?;

        Self::check_status(response.status())?;

        response
            .text()
            .await
            .map_err(|e| MarketDataError::from_transport(PROVIDER_ID, e))
    }

    /// Copy of `url` with the `apikey` query value replaced by `***`.
    fn masked_url(url: &reqwest::Url) -> String {
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(key, value)| {
                let value = if key == "apikey" {
                    "***".to_string()
                } else {
                    value.into_owned()
                };
                (key.into_owned(), value)
            })
            .collect();

        let mut masked = url.clone();
        masked.query_pairs_mut().clear().extend_pairs(pairs);
        masked.to_string()
    }

    /// Reject rate-limited and non-2xx responses.
    fn check_status(status: StatusCode) -> Result<(), MarketDataError> {
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(MarketDataError::RateLimited {
                provider: PROVIDER_ID.to_string(),
            });
        }

        if !status.is_success() {
            return Err(MarketDataError::provider(
                PROVIDER_ID,
                format!("HTTP {}", status),
            ));
        }

        Ok(())
    }

    /// Check for API-level errors in the response.
    fn check_api_error(
        error_message: &Option<String>,
        note: &Option<String>,
        information: &Option<String>,
    ) -> Result<(), MarketDataError> {
        if let Some(ref msg) = error_message {
            if msg.contains("Invalid API call") || msg.contains("not found") {
                return Err(MarketDataError::SymbolNotFound(msg.clone()));
            }
            return Err(MarketDataError::provider(PROVIDER_ID, msg.clone()));
        }

        // Rate limiting shows up as a "Note" or "Information" message
        for msg in [note, information].into_iter().flatten() {
            if msg.contains("API call frequency")
                || msg.contains("rate limit")
                || msg.contains("requests per day")
            {
                return Err(MarketDataError::RateLimited {
                    provider: PROVIDER_ID.to_string(),
                });
            }
            warn!("Alpha Vantage message: {}", msg);
        }

        Ok(())
    }

    /// Parse a date string in YYYY-MM-DD format.
    fn parse_date(date_str: &str) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").ok()
    }

    /// Extract the closing price of one daily entry.
    ///
    /// Alpha Vantage sends prices as strings; plain numbers are accepted too.
    fn parse_close(entry: &serde_json::Value) -> Option<Decimal> {
        match entry.get("4. close")? {
            serde_json::Value::String(s) => Decimal::from_str(s.trim()).ok(),
            serde_json::Value::Number(n) => n.as_f64().and_then(Decimal::from_f64),
            _ => None,
        }
    }

    /// Turn a TIME_SERIES_DAILY body into a series of the most recent `limit` closes.
    ///
    /// Dates are sorted ascending and the newest `limit` kept before entries
    /// are parsed; malformed entries are skipped, not fatal.
    fn parse_daily_series(text: &str, limit: usize) -> Result<HistorySeries, MarketDataError> {
        let response: TimeSeriesResponse =
            serde_json::from_str(text).map_err(|e| MarketDataError::ValidationFailed {
                message: format!("Failed to parse response: {}", e),
            })?;

        Self::check_api_error(
            &response.error_message,
            &response.note,
            &response.information,
        )?;

        let time_series = response.time_series.ok_or_else(|| {
            MarketDataError::provider(PROVIDER_ID, "Response has no daily time series")
        })?;

        let mut dates: Vec<&String> = time_series.keys().collect();
        dates.sort();
        let skip = dates.len().saturating_sub(limit);

        let points: Vec<HistoryPoint> = dates
            .into_iter()
            .skip(skip)
            .filter_map(|date_str| {
                let date = Self::parse_date(date_str)?;
                let close = time_series.get(date_str).and_then(Self::parse_close);
                match close {
                    Some(close) => Some(HistoryPoint { date, close }),
                    None => {
                        debug!("Skipping malformed Alpha Vantage entry for {}", date_str);
                        None
                    }
                }
            })
            .collect();

        Ok(HistorySeries::from_points(points, limit))
    }

    /// Fetch the daily series, surfacing every failure.
    pub async fn fetch_daily_series(&self, symbol: &str) -> Result<HistorySeries, MarketDataError> {
        let params = [
            ("function", "TIME_SERIES_DAILY"),
            ("symbol", symbol),
            ("outputsize", "compact"),
        ];

        let text = self.fetch(&params).await?;
        let series = Self::parse_daily_series(&text, self.limit)?;

        debug!(
            "Alpha Vantage: fetched {} daily closes for {}",
            series.len(),
            symbol
        );

        Ok(series)
    }
}

#[async_trait]
impl HistoryProvider for AlphaVantageProvider {
    async fn daily_history(&self, symbol: &str) -> HistorySeries {
        match self.fetch_daily_series(symbol).await {
            Ok(series) => series,
            Err(e) => {
                warn!(
                    "Alpha Vantage history unavailable for {}: {}; using empty series",
                    symbol, e
                );
                HistorySeries::empty()
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve a single canned HTTP response on a local port, returning its URL.
    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
        });

        format!("http://{}/query", addr)
    }

    fn provider_at(base_url: String) -> AlphaVantageProvider {
        AlphaVantageProvider::with_timeout("demo".to_string(), Duration::from_secs(5))
            .with_base_url(base_url)
    }

    fn daily_body(days: u32) -> String {
        let entries: Vec<String> = (1..=days)
            .map(|d| {
                format!(
                    r#""2024-01-{:02}": {{"1. open": "1.0", "4. close": "{}.50", "5. volume": "100"}}"#,
                    d, d
                )
            })
            .collect();
        format!(
            r#"{{"Meta Data": {{"2. Symbol": "IBM"}}, "Time Series (Daily)": {{{}}}}}"#,
            entries.join(",")
        )
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            AlphaVantageProvider::parse_date("2024-01-15"),
            NaiveDate::from_ymd_opt(2024, 1, 15)
        );
        assert!(AlphaVantageProvider::parse_date("invalid").is_none());
        assert!(AlphaVantageProvider::parse_date("2024/01/15").is_none());
    }

    #[test]
    fn test_parse_close() {
        let entry = serde_json::json!({"4. close": "150.25"});
        assert_eq!(AlphaVantageProvider::parse_close(&entry), Some(dec!(150.25)));

        let entry = serde_json::json!({"4. close": 150.5});
        assert_eq!(AlphaVantageProvider::parse_close(&entry), Some(dec!(150.5)));

        let entry = serde_json::json!({"4. close": "n/a"});
        assert_eq!(AlphaVantageProvider::parse_close(&entry), None);

        let entry = serde_json::json!({"1. open": "150.25"});
        assert_eq!(AlphaVantageProvider::parse_close(&entry), None);
    }

    #[test]
    fn test_parse_daily_series_sorted_ascending() {
        let body = r#"{
            "Time Series (Daily)": {
                "2024-01-03": {"4. close": "103.00"},
                "2024-01-01": {"4. close": "101.00"},
                "2024-01-02": {"4. close": "102.00"}
            }
        }"#;

        let series = AlphaVantageProvider::parse_daily_series(body, HISTORY_LIMIT).unwrap();
        assert_eq!(series.closes(), vec![dec!(101), dec!(102), dec!(103)]);
        assert_eq!(
            series.dates(),
            vec![
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
                NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
            ]
        );
    }

    #[test]
    fn test_parse_daily_series_keeps_last_thirty() {
        let series =
            AlphaVantageProvider::parse_daily_series(&daily_body(31), HISTORY_LIMIT).unwrap();
        assert_eq!(series.len(), 30);
        assert_eq!(series.closes().first(), Some(&dec!(2.50)));
        assert_eq!(series.closes().last(), Some(&dec!(31.50)));
        assert_eq!(series.closes().len(), series.dates().len());
    }

    #[test]
    fn test_parse_daily_series_skips_malformed_entries() {
        let body = r#"{
            "Time Series (Daily)": {
                "2024-01-01": {"4. close": "101.00"},
                "2024-01-02": {"4. close": "oops"},
                "2024-01-03": {"1. open": "103.00"},
                "not-a-date": {"4. close": "104.00"},
                "2024-01-05": {"4. close": "105.00"}
            }
        }"#;

        let series = AlphaVantageProvider::parse_daily_series(body, HISTORY_LIMIT).unwrap();
        assert_eq!(series.closes(), vec![dec!(101), dec!(105)]);
    }

    #[test]
    fn test_parse_rate_limit_note() {
        let body = r#"{
            "Note": "Thank you for using Alpha Vantage! Our standard API call frequency is 5 calls per minute and 500 calls per day."
        }"#;

        let err = AlphaVantageProvider::parse_daily_series(body, HISTORY_LIMIT).unwrap_err();
        assert!(err.is_rate_limited());
    }

    #[test]
    fn test_parse_rate_limit_information() {
        let body = r#"{
            "Information": "We have detected your API key and our standard API rate limit is 25 requests per day."
        }"#;

        let err = AlphaVantageProvider::parse_daily_series(body, HISTORY_LIMIT).unwrap_err();
        assert!(err.is_rate_limited());
    }

    #[test]
    fn test_parse_error_message() {
        let body = r#"{"Error Message": "Invalid API call. Please retry or visit the documentation."}"#;

        let err = AlphaVantageProvider::parse_daily_series(body, HISTORY_LIMIT).unwrap_err();
        assert!(matches!(err, MarketDataError::SymbolNotFound(_)));
    }

    #[test]
    fn test_parse_missing_series_and_garbage() {
        let err = AlphaVantageProvider::parse_daily_series("{}", HISTORY_LIMIT).unwrap_err();
        assert!(matches!(err, MarketDataError::ProviderError { .. }));

        let err =
            AlphaVantageProvider::parse_daily_series("<html>busy</html>", HISTORY_LIMIT).unwrap_err();
        assert!(matches!(err, MarketDataError::ValidationFailed { .. }));

        let body = r#"{"Time Series (Daily)": "unavailable"}"#;
        let err = AlphaVantageProvider::parse_daily_series(body, HISTORY_LIMIT).unwrap_err();
        assert!(matches!(err, MarketDataError::ValidationFailed { .. }));
    }

    #[test]
    fn test_check_status() {
        let err =
            AlphaVantageProvider::check_status(StatusCode::TOO_MANY_REQUESTS).unwrap_err();
        assert!(err.is_rate_limited());

        let err =
            AlphaVantageProvider::check_status(StatusCode::INTERNAL_SERVER_ERROR).unwrap_err();
        assert!(matches!(
            err,
            MarketDataError::ProviderError { ref message, .. } if message.contains("500")
        ));

        assert!(AlphaVantageProvider::check_status(StatusCode::OK).is_ok());
    }

    #[test]
    fn test_masked_url_hides_encoded_key() {
        let url = reqwest::Url::parse_with_params(
            BASE_URL,
            &[("symbol", "IBM"), ("apikey", "ab+c/d=")],
        )
        .unwrap();

        let masked = AlphaVantageProvider::masked_url(&url);
        assert!(masked.contains("symbol=IBM"));
        assert!(masked.contains("apikey=***"));
        assert!(!masked.contains("ab+c"));
        assert!(!masked.contains("ab%2Bc"));
    }

    #[tokio::test]
    async fn test_daily_history_unreachable_endpoint_is_empty() {
        let provider = provider_at("http://127.0.0.1:9/query".to_string());

        let err = provider.fetch_daily_series("IBM").await.unwrap_err();
        assert!(matches!(
            err,
            MarketDataError::Network(_) | MarketDataError::Timeout { .. }
        ));
        assert_eq!(provider.daily_history("IBM").await, HistorySeries::empty());
    }

    #[tokio::test]
    async fn test_daily_history_rate_limit_note_is_empty() {
        let body = r#"{"Note": "Our standard API call frequency is 5 calls per minute."}"#;
        let provider = provider_at(serve_once("200 OK", body).await);

        assert_eq!(provider.daily_history("IBM").await, HistorySeries::empty());
    }

    #[tokio::test]
    async fn test_daily_history_http_429_is_empty() {
        let provider = provider_at(serve_once("429 Too Many Requests", "{}").await);

        assert_eq!(provider.daily_history("IBM").await, HistorySeries::empty());
    }

    #[tokio::test]
    async fn test_daily_history_served_series() {
        let body = r#"{"Time Series (Daily)": {
            "2024-01-02": {"4. close": "102.00"},
            "2024-01-01": {"4. close": "101.00"}
        }}"#;
        let provider = provider_at(serve_once("200 OK", body).await);

        let series = provider.daily_history("IBM").await;
        assert_eq!(series.closes(), vec![dec!(101), dec!(102)]);
    }

    #[test]
    fn test_parse_empty_series() {
        let body = r#"{"Time Series (Daily)": {}}"#;
        let series = AlphaVantageProvider::parse_daily_series(body, HISTORY_LIMIT).unwrap();
        assert!(series.is_empty());
    }
}
