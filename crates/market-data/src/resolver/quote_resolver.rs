use async_trait::async_trait;
use rust_decimal::Decimal;
use tracing::debug;

use super::chain::{EvidenceCache, FieldChain, Payload, Strategy};
use crate::models::{Bar, HistoryWindow, Lookup, MarketState, QuoteSnapshot, SourceKind};
use crate::provider::{QuoteProvider, QuoteSource};

const SUMMARY: SourceKind = SourceKind::Summary;

fn bars_of(payload: &Payload) -> Option<&[Bar]> {
    payload.bars().filter(|bars| !bars.is_empty())
}

fn financial_current_price(payload: &Payload) -> Option<Decimal> {
    payload.summary().and_then(|s| s.current_price)
}

fn regular_market_price(payload: &Payload) -> Option<Decimal> {
    payload.summary().and_then(|s| s.regular_market_price)
}

fn last_close(payload: &Payload) -> Option<Decimal> {
    bars_of(payload).and_then(|bars| bars.last()).map(|bar| bar.close)
}

fn summary_open(payload: &Payload) -> Option<Decimal> {
    payload.summary().and_then(|s| s.open)
}

fn first_open(payload: &Payload) -> Option<Decimal> {
    bars_of(payload).and_then(|bars| bars.first()).map(|bar| bar.open)
}

fn summary_previous_close(payload: &Payload) -> Option<Decimal> {
    payload.summary().and_then(|s| s.previous_close)
}

fn second_to_last_close(payload: &Payload) -> Option<Decimal> {
    let bars = bars_of(payload)?;
    if bars.len() < 2 {
        return None;
    }
    Some(bars[bars.len() - 2].close)
}

fn summary_volume(payload: &Payload) -> Option<u64> {
    payload.summary().and_then(|s| s.volume)
}

fn last_volume(payload: &Payload) -> Option<u64> {
    bars_of(payload).and_then(|bars| bars.last()).map(|bar| bar.volume)
}

fn summary_year_high(payload: &Payload) -> Option<Decimal> {
    payload.summary().and_then(|s| s.fifty_two_week_high)
}

fn max_high(payload: &Payload) -> Option<Decimal> {
    bars_of(payload)?.iter().map(|bar| bar.high).max()
}

fn summary_year_low(payload: &Payload) -> Option<Decimal> {
    payload.summary().and_then(|s| s.fifty_two_week_low)
}

fn min_low(payload: &Payload) -> Option<Decimal> {
    bars_of(payload)?.iter().map(|bar| bar.low).min()
}

fn market_state(payload: &Payload) -> Option<MarketState> {
    payload
        .summary()
        .and_then(|s| s.market_state.as_deref())
        .map(MarketState::parse)
}

fn long_name(payload: &Payload) -> Option<String> {
    payload.summary().and_then(|s| s.long_name.clone())
}

fn short_name(payload: &Payload) -> Option<String> {
    payload.summary().and_then(|s| s.short_name.clone())
}

/// Resolves every quote field of a ticker from a single [`QuoteSource`].
pub struct QuoteResolver<S> {
    source: S,
    current_price: FieldChain<Decimal>,
    open: FieldChain<Decimal>,
    previous_close: FieldChain<Decimal>,
    volume: FieldChain<u64>,
    year_high: FieldChain<Decimal>,
    year_low: FieldChain<Decimal>,
    market_state: FieldChain<MarketState>,
    company_name: FieldChain<String>,
}

impl<S: QuoteSource> QuoteResolver<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            current_price: FieldChain::starting_with(Strategy::new(
                "financialData.currentPrice",
                SUMMARY,
                financial_current_price,
            ))
            .or(Strategy::new(
                "price.regularMarketPrice",
                SUMMARY,
                regular_market_price,
            ))
            .or(Strategy::new(
                "history.lastClose",
                SourceKind::History(HistoryWindow::Intraday),
                last_close,
            )),
            open: FieldChain::starting_with(Strategy::new(
                "summaryDetail.open",
                SUMMARY,
                summary_open,
            ))
            .or(Strategy::new(
                "history.firstOpen",
                SourceKind::History(HistoryWindow::OneDay),
                first_open,
            )),
            previous_close: FieldChain::starting_with(Strategy::new(
                "summaryDetail.previousClose",
                SUMMARY,
                summary_previous_close,
            ))
            .or(Strategy::new(
                "history.priorClose",
                SourceKind::History(HistoryWindow::TwoDays),
                second_to_last_close,
            )),
            volume: FieldChain::starting_with(Strategy::new(
                "summaryDetail.volume",
                SUMMARY,
                summary_volume,
            ))
            .or(Strategy::new(
                "history.lastVolume",
                SourceKind::History(HistoryWindow::OneDay),
                last_volume,
            )),
            year_high: FieldChain::starting_with(Strategy::new(
                "summaryDetail.fiftyTwoWeekHigh",
                SUMMARY,
                summary_year_high,
            ))
            .or(Strategy::new(
                "history.maxHigh",
                SourceKind::History(HistoryWindow::OneYear),
                max_high,
            )),
            year_low: FieldChain::starting_with(Strategy::new(
                "summaryDetail.fiftyTwoWeekLow",
                SUMMARY,
                summary_year_low,
            ))
            .or(Strategy::new(
                "history.minLow",
                SourceKind::History(HistoryWindow::OneYear),
                min_low,
            )),
            market_state: FieldChain::starting_with(Strategy::new(
                "price.marketState",
                SUMMARY,
                market_state,
            )),
            company_name: FieldChain::starting_with(Strategy::new(
                "price.longName",
                SUMMARY,
                long_name,
            ))
            .or(Strategy::new("price.shortName", SUMMARY, short_name)),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}

fn log_unresolved<T>(symbol: &str, field: &str, lookup: &Lookup<T>) {
    if let Some(reason) = lookup.reason() {
        debug!("{} {} unavailable: {}", symbol, field, reason);
    }
}

#[async_trait]
impl<S: QuoteSource> QuoteProvider for QuoteResolver<S> {
    async fn snapshot(&self, symbol: &str) -> QuoteSnapshot {
        let mut cache = EvidenceCache::new(&self.source, symbol);
        let mut snapshot = QuoteSnapshot::new(symbol);

        snapshot.current_price = cache.resolve(&self.current_price).await;
        snapshot.open = cache.resolve(&self.open).await;
        snapshot.previous_close = cache.resolve(&self.previous_close).await;
        snapshot.volume = cache.resolve(&self.volume).await;
        snapshot.fifty_two_week_high = cache.resolve(&self.year_high).await;
        snapshot.fifty_two_week_low = cache.resolve(&self.year_low).await;

        snapshot.market_state = cache
            .resolve(&self.market_state)
            .await
            .into_option()
            .unwrap_or_default();
        if let Some(name) = cache.resolve(&self.company_name).await.into_option() {
            snapshot.company_name = name;
        }

        log_unresolved(symbol, "current price", &snapshot.current_price);
        log_unresolved(symbol, "open", &snapshot.open);
        log_unresolved(symbol, "previous close", &snapshot.previous_close);
        log_unresolved(symbol, "volume", &snapshot.volume);
        log_unresolved(symbol, "52-week high", &snapshot.fifty_two_week_high);
        log_unresolved(symbol, "52-week low", &snapshot.fifty_two_week_low);

        snapshot.sources_consulted = cache.sources_consulted();
        snapshot.source_failures = cache.failures();
        snapshot
    }
}
