//! Market data provider abstractions and implementations.
//!
//! This module contains:
//! - The `QuoteSource` trait for raw quote lookups (summary fields, price history)
//! - The `QuoteProvider` and `HistoryProvider` traits the core depends on
//! - Concrete provider implementations (Yahoo, Alpha Vantage)
//!
//! # Failure model
//!
//! `QuoteSource` methods return `Result` so that the resolver can record why
//! a source failed. `QuoteProvider` and `HistoryProvider` are the adapter
//! boundary: they never fail, and report degradation through
//! [`Lookup`](crate::models::Lookup) fields or an empty series instead.

mod traits;

pub mod alpha_vantage;
pub mod yahoo;

pub use traits::{HistoryProvider, QuoteProvider, QuoteSource};
