//! Derived metrics and alert rule for one ticker.
//!
//! Pure functions only: everything here takes a resolved quote snapshot and
//! a history series and returns the published record.

use rust_decimal::Decimal;
use tickerboard_market_data::{HistorySeries, QuoteSnapshot, HISTORY_LIMIT};

use super::model::{AlertDirection, AlertEvent, StockRecord};
use crate::constants::{ALERT_THRESHOLD_PERCENT, DISPLAY_DECIMAL_PRECISION};

/// An absolute change and the same change as a percentage of its base.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Change {
    pub amount: Decimal,
    pub percent: Decimal,
}

fn round(value: Decimal) -> Decimal {
    value.round_dp(DISPLAY_DECIMAL_PRECISION)
}

/// Change from `base` to `current`, rounded for display.
///
/// Returns `None` when the percentage cannot be computed.
fn change_between(current: Decimal, base: Decimal) -> Option<Change> {
    let amount = current.checked_sub(base)?;
    let percent = amount
        .checked_div(base)?
        .checked_mul(Decimal::ONE_HUNDRED)?;
    Some(Change {
        amount: round(amount),
        percent: round(percent),
    })
}

/// Day change against the session open. Requires a non-zero open.
pub fn day_change(current: Option<Decimal>, open: Option<Decimal>) -> Option<Change> {
    match (current, open) {
        (Some(current), Some(open)) if !open.is_zero() => change_between(current, open),
        _ => None,
    }
}

/// Change against the previous close. Requires a positive previous close.
pub fn change_from_close(
    current: Option<Decimal>,
    previous_close: Option<Decimal>,
) -> Option<Change> {
    match (current, previous_close) {
        (Some(current), Some(previous)) if previous > Decimal::ZERO => {
            change_between(current, previous)
        }
        _ => None,
    }
}

/// Alert for a rounded day change percent past the threshold, if any.
pub fn alert_for(ticker: &str, day_change_percent: Option<Decimal>) -> Option<AlertEvent> {
    let percent = day_change_percent?;
    let direction = if percent > ALERT_THRESHOLD_PERCENT {
        AlertDirection::Up
    } else if percent < -ALERT_THRESHOLD_PERCENT {
        AlertDirection::Down
    } else {
        return None;
    };

    Some(AlertEvent {
        ticker: ticker.to_string(),
        direction,
        percent,
    })
}

/// Build the dashboard record for one ticker, plus its alert if any.
pub fn aggregate(
    snapshot: &QuoteSnapshot,
    history: &HistorySeries,
) -> (StockRecord, Option<AlertEvent>) {
    let current = snapshot.current_price.get();
    let day = day_change(current, snapshot.open.get());
    let from_close = change_from_close(current, snapshot.previous_close.get());

    let skip = history.len().saturating_sub(HISTORY_LIMIT);
    let historical_data = history.closes().into_iter().skip(skip).map(round).collect();
    let historical_dates = history.dates().into_iter().skip(skip).collect();

    let record = StockRecord {
        ticker: snapshot.symbol.clone(),
        company_name: snapshot.company_name.clone(),
        current_price: current.map(round),
        day_change: day.map(|c| c.amount),
        day_change_percent: day.map(|c| c.percent),
        previous_close: snapshot.previous_close.get().map(round),
        change_from_close: from_close.map(|c| c.amount),
        change_from_close_percent: from_close.map(|c| c.percent),
        volume: snapshot.volume.get(),
        fifty_two_week_high: snapshot.fifty_two_week_high.get().map(round),
        fifty_two_week_low: snapshot.fifty_two_week_low.get().map(round),
        market_open: snapshot.market_open(),
        historical_data,
        historical_dates,
    };

    let alert = alert_for(&record.ticker, record.day_change_percent);
    (record, alert)
}
