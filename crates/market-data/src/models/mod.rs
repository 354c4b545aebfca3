//! Market data models
//!
//! This module contains the core data types for market data operations:
//! - `types` - Source and chart window identifiers (SourceKind, HistoryWindow)
//! - `lookup` - Explicit resolved/unavailable result (Lookup, Unavailable)
//! - `quote` - Quote data structures (QuoteSummary, Bar, QuoteSnapshot, MarketState)
//! - `history` - Daily close series (HistorySeries, HistoryPoint)

mod history;
mod lookup;
mod quote;
mod types;

pub use history::{HistoryPoint, HistorySeries, HISTORY_LIMIT};
pub use lookup::{Lookup, Unavailable};
pub use quote::{Bar, MarketState, QuoteSnapshot, QuoteSummary};
pub use types::{HistoryWindow, SourceKind};
