//! Monthly purchase-date resolution.
//!
//! For each calendar month spanned by the series the purchase lands on the
//! scheduled day if it has a quote, otherwise on the next quoted day of the
//! same month, otherwise on the latest quoted day of the month. Months with
//! no quote at all are skipped.

use crate::domain::price_series::PriceSeries;
use chrono::{Datelike, Months, NaiveDate};

/// Days above this are clamped so every month has the target day.
pub const MAX_SCHEDULE_DAY: u32 = 28;

pub fn resolve_execution_date(
    series: &PriceSeries,
    year: i32,
    month: u32,
    schedule_day: u32,
) -> Option<NaiveDate> {
    let month_start = NaiveDate::from_ymd_opt(year, month, 1)?;
    let month_end = last_day_of_month(month_start);
    let target = month_start.with_day(schedule_day.clamp(1, MAX_SCHEDULE_DAY))?;

    if series.contains(target) {
        return Some(target);
    }
    if let Some(p) = series.between(target, month_end).first() {
        return Some(p.date);
    }
    // Latest in the whole month, which can only precede the target here.
    series.between(month_start, month_end).last().map(|p| p.date)
}

/// Execution dates for every month from the series' first to last date,
/// ascending and without duplicates.
pub fn execution_dates(series: &PriceSeries, schedule_day: u32) -> Vec<NaiveDate> {
    let last_month = first_of_month(series.last().date);
    let mut month = first_of_month(series.first().date);
    let mut dates = Vec::new();

    while month <= last_month {
        match resolve_execution_date(series, month.year(), month.month(), schedule_day) {
            Some(d) => {
                tracing::debug!(
                    month = %month.format("%Y-%m"),
                    date = %d,
                    "resolved purchase date"
                );
                dates.push(d);
            }
            None => {
                tracing::warn!(
                    month = %month.format("%Y-%m"),
                    "no quotes in month, skipping purchase"
                );
            }
        }
        month = match month.checked_add_months(Months::new(1)) {
            Some(next) => next,
            None => break,
        };
    }

    dates.sort();
    dates.dedup();
    dates
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

fn last_day_of_month(month_start: NaiveDate) -> NaiveDate {
    month_start
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(NaiveDate::MAX)
}
