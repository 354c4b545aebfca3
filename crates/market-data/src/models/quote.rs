use rust_decimal::Decimal;

use super::lookup::Lookup;
use super::types::SourceKind;

/// Direct quote fields as reported by a quote source.
///
/// Every field is optional: providers routinely omit values outside
/// trading hours or for thinly traded symbols.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QuoteSummary {
    /// Current price as reported in financial data
    pub current_price: Option<Decimal>,
    /// Last traded price of the regular session
    pub regular_market_price: Option<Decimal>,
    pub open: Option<Decimal>,
    pub previous_close: Option<Decimal>,
    pub volume: Option<u64>,
    pub fifty_two_week_high: Option<Decimal>,
    pub fifty_two_week_low: Option<Decimal>,
    /// Raw market state string (REGULAR, PRE, POST, CLOSED, ...)
    pub market_state: Option<String>,
    pub long_name: Option<String>,
    pub short_name: Option<String>,
}

/// One OHLCV bar from a price history query.
#[derive(Clone, Debug, PartialEq)]
pub struct Bar {
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: u64,
}

/// Trading session state of a market.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum MarketState {
    #[default]
    Regular,
    Pre,
    PrePre,
    Post,
    PostPost,
    Closed,
    Other(String),
}

impl MarketState {
    /// Parse a provider market state string; unknown values are kept verbatim.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_uppercase().as_str() {
            "REGULAR" => Self::Regular,
            "PRE" => Self::Pre,
            "PREPRE" => Self::PrePre,
            "POST" => Self::Post,
            "POSTPOST" => Self::PostPost,
            "CLOSED" => Self::Closed,
            _ => Self::Other(raw.trim().to_string()),
        }
    }

    /// Regular session and pre-market count as open.
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Regular | Self::Pre | Self::PrePre)
    }
}

/// Resolved quote fields for a single ticker.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QuoteSnapshot {
    pub symbol: String,
    pub current_price: Lookup<Decimal>,
    pub open: Lookup<Decimal>,
    pub previous_close: Lookup<Decimal>,
    pub volume: Lookup<u64>,
    pub fifty_two_week_high: Lookup<Decimal>,
    pub fifty_two_week_low: Lookup<Decimal>,
    pub market_state: MarketState,
    pub company_name: String,

    /// Number of distinct sources fetched while resolving
    pub sources_consulted: usize,
    /// Sources that could not be fetched, with the provider error
    pub source_failures: Vec<(SourceKind, String)>,
}

impl QuoteSnapshot {
    /// A snapshot with nothing resolved; the company name falls back to the symbol.
    pub fn new(symbol: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            company_name: symbol.to_string(),
            ..Default::default()
        }
    }

    pub fn market_open(&self) -> bool {
        self.market_state.is_open()
    }

    /// True when at least one source was consulted and every one of them failed.
    pub fn all_sources_failed(&self) -> bool {
        self.sources_consulted > 0 && self.source_failures.len() >= self.sources_consulted
    }
}
