//! Tickerboard Core - watchlist pipeline, aggregation and dashboard output.
//!
//! This crate turns the provider-neutral data from `tickerboard-market-data`
//! into the dashboard artifacts consumed by the static site.

pub mod constants;
pub mod dashboard;
pub mod errors;
pub mod watchlist;

pub use dashboard::{
    aggregate, AlertDirection, AlertEvent, DashboardPayload, DashboardRun, DashboardService,
    DashboardWriter, StockRecord, WriteSummary,
};
pub use watchlist::{parse_watchlist, read_watchlist};

// Re-export error types
pub use errors::Error;
pub use errors::Result;
