//! Core error types for the Tickerboard pipeline.

use std::path::PathBuf;
use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the dashboard pipeline.
///
/// Provider failures never show up here: the market data adapters convert
/// them into unavailable fields. `QuoteUnavailable` is the only per-ticker
/// error; everything else aborts the run.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Watchlist not found: {}", .0.display())]
    WatchlistNotFound(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("No quote source answered for {0}")]
    QuoteUnavailable(String),
}
