use std::fmt;

/// Chart window used when a quote field falls back to price history.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum HistoryWindow {
    /// Today's one-minute bars
    Intraday,
    /// Today's daily bar
    OneDay,
    /// The last two daily bars
    TwoDays,
    /// One year of daily bars
    OneYear,
}

impl HistoryWindow {
    /// Range parameter understood by the chart API.
    pub fn range(&self) -> &'static str {
        match self {
            Self::Intraday | Self::OneDay => "1d",
            Self::TwoDays => "2d",
            Self::OneYear => "1y",
        }
    }

    /// Interval parameter understood by the chart API.
    pub fn interval(&self) -> &'static str {
        match self {
            Self::Intraday => "1m",
            Self::OneDay | Self::TwoDays | Self::OneYear => "1d",
        }
    }
}

/// A single place a quote field can be looked up.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum SourceKind {
    /// Quote summary (direct info fields)
    Summary,
    /// Price history over a chart window
    History(HistoryWindow),
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Summary => write!(f, "summary"),
            Self::History(window) => {
                write!(f, "history({}/{})", window.range(), window.interval())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_parameters() {
        assert_eq!(HistoryWindow::Intraday.range(), "1d");
        assert_eq!(HistoryWindow::Intraday.interval(), "1m");
        assert_eq!(HistoryWindow::TwoDays.range(), "2d");
        assert_eq!(HistoryWindow::OneYear.interval(), "1d");
    }

    #[test]
    fn test_source_display() {
        assert_eq!(SourceKind::Summary.to_string(), "summary");
        assert_eq!(
            SourceKind::History(HistoryWindow::Intraday).to_string(),
            "history(1d/1m)"
        );
    }
}
