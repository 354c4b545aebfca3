use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Number of daily closes kept for the dashboard sparkline.
pub const HISTORY_LIMIT: usize = 30;

/// A daily closing price.
#[derive(Clone, Debug, PartialEq)]
pub struct HistoryPoint {
    pub date: NaiveDate,
    pub close: Decimal,
}

/// Daily closes ordered oldest to newest.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HistorySeries {
    points: Vec<HistoryPoint>,
}

impl HistorySeries {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Sort points by date and keep the most recent `limit`.
    pub fn from_points(mut points: Vec<HistoryPoint>, limit: usize) -> Self {
        points.sort_by(|a, b| a.date.cmp(&b.date));
        let skip = points.len().saturating_sub(limit);
        points.drain(..skip);
        Self { points }
    }

    pub fn points(&self) -> &[HistoryPoint] {
        &self.points
    }

    pub fn closes(&self) -> Vec<Decimal> {
        self.points.iter().map(|p| p.close).collect()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|p| p.date).collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
