//! Simulation parameters and the history window they imply.

use chrono::{Days, Months, NaiveDate};

pub const DEFAULT_HISTORY_YEARS: i64 = 5;
pub const DEFAULT_SCHEDULE_DAY: i64 = 5;
pub const DEFAULT_MONTHLY_AMOUNT: f64 = 1000.0;
pub const DEFAULT_ASSET: &str = "BTC-USD";
pub const DEFAULT_FX: &str = "USDBRL=X";

#[derive(Debug, Clone, PartialEq)]
pub struct DcaConfig {
    pub history_years: u32,
    pub schedule_day: u32,
    pub monthly_amount: f64,
    pub asset: String,
    pub fx: String,
}

impl DcaConfig {
    /// `[start, end)` covering `history_years` back from `as_of`, with
    /// `as_of` itself included.
    pub fn window(&self, as_of: NaiveDate) -> (NaiveDate, NaiveDate) {
        history_window(as_of, self.history_years)
    }
}

pub fn history_window(as_of: NaiveDate, years: u32) -> (NaiveDate, NaiveDate) {
    let start = as_of
        .checked_sub_months(Months::new(years.saturating_mul(12)))
        .unwrap_or(NaiveDate::MIN);
    let end = as_of.checked_add_days(Days::new(1)).unwrap_or(NaiveDate::MAX);
    (start, end)
}
