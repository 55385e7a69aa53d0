//! Calendar helpers for monthly reports.

use chrono::{Datelike, Months, NaiveDate};

/// First day of the month containing `date`.
#[must_use]
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Last day of the month containing `date`.
#[must_use]
pub fn month_end(date: NaiveDate) -> NaiveDate {
    month_start(date)
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(date)
}

/// Last day of the month before the one containing `date`.
#[must_use]
pub fn previous_month_end(date: NaiveDate) -> NaiveDate {
    month_start(date).pred_opt().unwrap_or(date)
}

/// `YYYY-MM` label of the month containing `date`.
#[must_use]
pub fn month_label(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

/// Sample dates for a month-end trend of `months` points, oldest first.
///
/// Every point is a month end except the last, which is `today`.
#[must_use]
pub fn trend_dates(today: NaiveDate, months: u32) -> Vec<NaiveDate> {
    (0..months)
        .rev()
        .filter_map(|back| {
            if back == 0 {
                Some(today)
            } else {
                today.checked_sub_months(Months::new(back)).map(month_end)
            }
        })
        .collect()
}
