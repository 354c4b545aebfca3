//! Domain models for the dashboard artifacts.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::LAST_UPDATED_FORMAT;

/// One row of the dashboard.
///
/// Every numeric field is `None` (serialized as `null`) when it could not be
/// resolved or derived; a missing value is never published as zero.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockRecord {
    pub ticker: String,
    pub company_name: String,
    pub current_price: Option<Decimal>,
    pub day_change: Option<Decimal>,
    pub day_change_percent: Option<Decimal>,
    pub previous_close: Option<Decimal>,
    pub change_from_close: Option<Decimal>,
    pub change_from_close_percent: Option<Decimal>,
    pub volume: Option<u64>,
    pub fifty_two_week_high: Option<Decimal>,
    pub fifty_two_week_low: Option<Decimal>,
    pub market_open: bool,
    /// Daily closes, oldest first
    pub historical_data: Vec<Decimal>,
    /// Dates of `historical_data`, same length and order
    pub historical_dates: Vec<NaiveDate>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertDirection {
    Up,
    Down,
}

impl fmt::Display for AlertDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Up => write!(f, "up"),
            Self::Down => write!(f, "down"),
        }
    }
}

/// A day move past the alert threshold.
#[derive(Clone, Debug, PartialEq)]
pub struct AlertEvent {
    pub ticker: String,
    pub direction: AlertDirection,
    /// Day change percent, already rounded to two decimals
    pub percent: Decimal,
}

impl AlertEvent {
    /// Line written to the alert file, e.g. `STOCK ALERT: AAPL is up 3.45%`.
    pub fn message(&self) -> String {
        format!(
            "STOCK ALERT: {} is {} {:.2}%",
            self.ticker, self.direction, self.percent
        )
    }
}

/// The `data.json` document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardPayload {
    pub last_updated: String,
    pub stocks: Vec<StockRecord>,
}

impl DashboardPayload {
    pub fn new(stocks: Vec<StockRecord>, generated_at: DateTime<Utc>) -> Self {
        Self {
            last_updated: generated_at.format(LAST_UPDATED_FORMAT).to_string(),
            stocks,
        }
    }
}

/// A ticker left out of the dashboard, with the reason.
#[derive(Clone, Debug, PartialEq)]
pub struct SkippedTicker {
    pub ticker: String,
    pub reason: String,
}

/// Outcome of one pass over the watchlist.
#[derive(Clone, Debug, PartialEq)]
pub struct DashboardRun {
    pub payload: DashboardPayload,
    pub alerts: Vec<AlertEvent>,
    pub skipped: Vec<SkippedTicker>,
}

impl DashboardRun {
    pub fn alert_messages(&self) -> Vec<String> {
        self.alerts.iter().map(AlertEvent::message).collect()
    }
}
