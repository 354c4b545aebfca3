use std::sync::Arc;

use chrono::Utc;
use log::{debug, error, info};
use tickerboard_market_data::{HistoryProvider, QuoteProvider, RequestGate};

use super::aggregator::aggregate;
use super::model::{AlertEvent, DashboardPayload, DashboardRun, SkippedTicker, StockRecord};
use crate::errors::{Error, Result};

/// Runs the watchlist through the providers, one ticker at a time.
///
/// Each ticker is isolated: a failure drops that ticker from the dashboard
/// and the run moves on. History requests go through the [`RequestGate`]
/// so consecutive calls stay spaced out for the history provider.
pub struct DashboardService {
    quotes: Arc<dyn QuoteProvider>,
    history: Arc<dyn HistoryProvider>,
    gate: RequestGate,
}

impl DashboardService {
    pub fn new(
        quotes: Arc<dyn QuoteProvider>,
        history: Arc<dyn HistoryProvider>,
        gate: RequestGate,
    ) -> Self {
        Self {
            quotes,
            history,
            gate,
        }
    }

    /// Build the record for one ticker.
    ///
    /// Fails with [`Error::QuoteUnavailable`] when every quote source the
    /// resolver tried failed outright.
    pub async fn process_ticker(
        &self,
        ticker: &str,
    ) -> Result<(StockRecord, Option<AlertEvent>)> {
        let snapshot = self.quotes.snapshot(ticker).await;
        if snapshot.all_sources_failed() {
            return Err(Error::QuoteUnavailable(ticker.to_string()));
        }

        self.gate.acquire().await;
        let history = self.history.daily_history(ticker).await;
        debug!("{}: {} daily closes", ticker, history.len());

        Ok(aggregate(&snapshot, &history))
    }

    /// Process every ticker in watchlist order.
    pub async fn run(&self, tickers: &[String]) -> DashboardRun {
        let mut stocks = Vec::with_capacity(tickers.len());
        let mut alerts = Vec::new();
        let mut skipped = Vec::new();

        for ticker in tickers {
            match self.process_ticker(ticker).await {
                Ok((record, alert)) => {
                    stocks.push(record);
                    alerts.extend(alert);
                }
                Err(e) => {
                    error!("Error processing {}: {}", ticker, e);
                    skipped.push(SkippedTicker {
                        ticker: ticker.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        info!(
            "Processed {} tickers: {} records, {} alerts, {} skipped",
            tickers.len(),
            stocks.len(),
            alerts.len(),
            skipped.len()
        );

        DashboardRun {
            payload: DashboardPayload::new(stocks, Utc::now()),
            alerts,
            skipped,
        }
    }
}
