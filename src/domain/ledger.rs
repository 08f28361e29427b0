//! Dollar-cost-averaging ledger simulation.
//!
//! One purchase per resolved month, each carrying the running holdings,
//! cost basis and profit/loss at that date's price.

use crate::domain::price_series::PriceSeries;
use crate::domain::schedule::execution_dates;
use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PurchaseEvent {
    pub date: NaiveDate,
    pub price: f64,
    /// Amount actually invested on this date. Zero when the purchase was
    /// skipped for a zero amount or a non-positive price.
    pub contribution: f64,
    pub units_bought: f64,
    pub cumulative_units: f64,
    pub cumulative_contributed: f64,
    /// `None` while no units are held.
    pub average_cost: Option<f64>,
    pub market_value: f64,
    pub pnl: f64,
    pub roi_percent: f64,
}

/// Chronological purchase events, at most one per month. Never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Ledger {
    events: Vec<PurchaseEvent>,
}

impl Ledger {
    pub fn events(&self) -> &[PurchaseEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn last(&self) -> &PurchaseEvent {
        &self.events[self.events.len() - 1]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PurchaseEvent> {
        self.events.iter()
    }
}

impl<'a> IntoIterator for &'a Ledger {
    type Item = &'a PurchaseEvent;
    type IntoIter = std::slice::Iter<'a, PurchaseEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}

#[derive(Debug, Default)]
struct Holdings {
    units: f64,
    contributed: f64,
}

impl Holdings {
    fn average_cost(&self) -> Option<f64> {
        (self.units > 0.0).then(|| self.contributed / self.units)
    }

    fn record(&mut self, date: NaiveDate, price: f64, monthly_amount: f64) -> PurchaseEvent {
        let (contribution, units_bought) = if monthly_amount > 0.0 && price > 0.0 {
            (monthly_amount, monthly_amount / price)
        } else {
            (0.0, 0.0)
        };
        self.units += units_bought;
        self.contributed += contribution;

        let market_value = self.units * price;
        let pnl = market_value - self.contributed;
        let roi_percent = if self.contributed > 0.0 {
            pnl / self.contributed * 100.0
        } else {
            0.0
        };

        PurchaseEvent {
            date,
            price,
            contribution,
            units_bought,
            cumulative_units: self.units,
            cumulative_contributed: self.contributed,
            average_cost: self.average_cost(),
            market_value,
            pnl,
            roi_percent,
        }
    }
}

/// Runs the monthly purchase schedule over `series`.
pub fn simulate(series: &PriceSeries, schedule_day: u32, monthly_amount: f64) -> Ledger {
    let mut holdings = Holdings::default();
    let events: Vec<PurchaseEvent> = execution_dates(series, schedule_day)
        .into_iter()
        .filter_map(|date| {
            series
                .price_on(date)
                .map(|price| holdings.record(date, price, monthly_amount))
        })
        .collect();

    if events.is_empty() {
        let last = series.last();
        tracing::warn!(date = %last.date, "no purchase dates resolved, emitting as-of row");
        return Ledger {
            events: vec![as_of_event(last.date, last.value)],
        };
    }

    tracing::info!(
        purchases = events.len(),
        first = %events[0].date,
        last = %events[events.len() - 1].date,
        "simulated ledger"
    );
    Ledger { events }
}

fn as_of_event(date: NaiveDate, price: f64) -> PurchaseEvent {
    PurchaseEvent {
        date,
        price,
        contribution: 0.0,
        units_bought: 0.0,
        cumulative_units: 0.0,
        cumulative_contributed: 0.0,
        average_cost: None,
        market_value: 0.0,
        pnl: 0.0,
        roi_percent: 0.0,
    }
}
