//! Current position summary, marked at the latest available price.

use crate::domain::ledger::Ledger;
use crate::domain::price_series::PriceSeries;
use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioSummary {
    pub as_of: NaiveDate,
    pub last_price: f64,
    pub current_units: f64,
    pub current_value: f64,
    pub total_contributed: f64,
    pub current_pnl: f64,
    pub current_roi_percent: f64,
    pub average_cost: Option<f64>,
}

impl PortfolioSummary {
    /// The series may extend past the last purchase; holdings are valued at
    /// its final point.
    pub fn compute(ledger: &Ledger, series: &PriceSeries) -> Self {
        let last_event = ledger.last();
        let last = series.last();

        let current_units = last_event.cumulative_units;
        let total_contributed = last_event.cumulative_contributed;
        let current_value = current_units * last.value;
        let current_pnl = current_value - total_contributed;
        let current_roi_percent = if total_contributed > 0.0 {
            current_pnl / total_contributed * 100.0
        } else {
            0.0
        };

        Self {
            as_of: last.date,
            last_price: last.value,
            current_units,
            current_value,
            total_contributed,
            current_pnl,
            current_roi_percent,
            average_cost: last_event.average_cost.filter(|_| current_units > 0.0),
        }
    }
}
