//! Quote field resolution.
//!
//! Each quote field is resolved by a [`FieldChain`] of strategies, tried in
//! order until one yields a value:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    FieldChain (current price)                │
//! │                                                              │
//! │  ┌────────────────────────────────────────────────────────┐ │
//! │  │ 1. financialData.currentPrice        (summary)          │ │
//! │  └────────────────────────────────────────────────────────┘ │
//! │                           │ miss                             │
//! │                           ▼                                  │
//! │  ┌────────────────────────────────────────────────────────┐ │
//! │  │ 2. price.regularMarketPrice          (summary)          │ │
//! │  └────────────────────────────────────────────────────────┘ │
//! │                           │ miss                             │
//! │                           ▼                                  │
//! │  ┌────────────────────────────────────────────────────────┐ │
//! │  │ 3. last intraday close               (history 1d/1m)    │ │
//! │  └────────────────────────────────────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Sources are shared between chains through an [`EvidenceCache`], so the
//! quote summary is requested once per ticker and a history window is only
//! requested when some field actually falls through to it.

mod chain;
mod quote_resolver;

pub use chain::{EvidenceCache, FieldChain, Payload, Strategy};
pub use quote_resolver::QuoteResolver;
