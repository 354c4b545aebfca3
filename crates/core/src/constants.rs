use rust_decimal::Decimal;

/// Decimal precision for every published number
pub const DISPLAY_DECIMAL_PRECISION: u32 = 2;

/// Day change percent above which an `up` alert is raised (below the negation, `down`)
pub const ALERT_THRESHOLD_PERCENT: Decimal = Decimal::TWO;

/// Dashboard document written on every run
pub const DATA_FILE_NAME: &str = "data.json";

/// Alert file, written only when a run produces alerts
pub const ALERT_FILE_NAME: &str = "alert_content.txt";

/// Format of the `lastUpdated` timestamp
pub const LAST_UPDATED_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// Prefix of comment lines in the watchlist
pub const WATCHLIST_COMMENT_PREFIX: char = '#';
