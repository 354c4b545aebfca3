//! Watchlist reader.
//!
//! A watchlist is a UTF-8 text file with one ticker per line. Blank lines and
//! lines starting with `#` are ignored. Symbols are not validated and
//! duplicates are kept.

use std::io::ErrorKind;
use std::path::Path;

use log::debug;

use crate::constants::WATCHLIST_COMMENT_PREFIX;
use crate::errors::{Error, Result};

/// Extract tickers from watchlist text, in file order.
pub fn parse_watchlist(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with(WATCHLIST_COMMENT_PREFIX))
        .map(str::to_string)
        .collect()
}

/// Read and parse a watchlist file.
///
/// Returns [`Error::WatchlistNotFound`] when the file does not exist and
/// [`Error::Io`] for any other read failure.
pub fn read_watchlist(path: &Path) -> Result<Vec<String>> {
    let text = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => Error::WatchlistNotFound(path.to_path_buf()),
        _ => Error::Io(e),
    })?;

    let tickers = parse_watchlist(&text);
    debug!("Read {} tickers from {}", tickers.len(), path.display());
    Ok(tickers)
}
