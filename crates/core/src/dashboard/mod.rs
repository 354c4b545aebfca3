//! Dashboard pipeline.
//!
//! - [`model`] - Published records, alerts and the `data.json` payload
//! - [`aggregator`] - Derived metrics and the alert rule (pure)
//! - [`service`] - Orchestrates providers per ticker with isolation
//! - [`writer`] - Writes `data.json` and `alert_content.txt`
//!
//! ```text
//! DashboardService → QuoteProvider / HistoryProvider (market-data crate)
//!       ↓
//!   aggregate() → DashboardRun → DashboardWriter
//! ```

pub mod aggregator;
pub mod model;
pub mod service;
pub mod writer;


pub use aggregator::{aggregate, alert_for, change_from_close, day_change, Change};
pub use model::{
    AlertDirection, AlertEvent, DashboardPayload, DashboardRun, SkippedTicker, StockRecord,
};
pub use service::DashboardService;
pub use writer::{DashboardWriter, WriteSummary};
