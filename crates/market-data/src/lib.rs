//! Tickerboard Market Data Crate
//!
//! This crate fetches per-ticker market data for the Tickerboard dashboard
//! from two external providers and hands it to the core in provider-neutral
//! form.
//!
//! # Overview
//!
//! - Yahoo Finance supplies the quote snapshot (price, open, previous close,
//!   volume, 52-week range, market state, company name)
//! - Alpha Vantage supplies the last 30 daily closes
//! - Both adapters degrade gracefully: they never return an error, only
//!   unavailable fields or an empty series
//!
//! # Architecture
//!
//! ```text
//! +------------------+        +------------------+
//! |   QuoteSource    |        |  Alpha Vantage   |
//! |  (Yahoo, mocks)  |        |    (history)     |
//! +------------------+        +------------------+
//!          |                           |
//!          v                           |
//! +------------------+                 |
//! |  EvidenceCache   |  (lazy, one fetch per source)
//! +------------------+                 |
//!          |                           |
//!          v                           |
//! +------------------+                 |
//! |   FieldChain     |  (chain of responsibility per field)
//! +------------------+                 |
//!          |                           |
//!          v                           v
//! +------------------+        +------------------+
//! |  QuoteSnapshot   |        |  HistorySeries   |
//! +------------------+        +------------------+
//! ```
//!
//! # Core Types
//!
//! - [`Lookup`] - A resolved value or a structured reason it is unavailable
//! - [`QuoteSnapshot`] - Resolved quote fields for one ticker
//! - [`HistorySeries`] - Oldest-to-newest daily closes
//! - [`RequestGate`] - Minimum-interval gate for rate-limited providers

pub mod errors;
pub mod models;
pub mod provider;
pub mod registry;
pub mod resolver;

pub use errors::MarketDataError;

pub use models::{
    Bar, HistoryPoint, HistorySeries, HistoryWindow, Lookup, MarketState, QuoteSnapshot,
    QuoteSummary, SourceKind, Unavailable, HISTORY_LIMIT,
};

pub use provider::alpha_vantage::AlphaVantageProvider;
pub use provider::yahoo::YahooProvider;
pub use provider::{HistoryProvider, QuoteProvider, QuoteSource};

pub use registry::RequestGate;

pub use resolver::{EvidenceCache, FieldChain, Payload, QuoteResolver, Strategy};
