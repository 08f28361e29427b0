#![allow(dead_code)]

use chrono::{Datelike, NaiveDate, Weekday};
use dcasim::domain::config::DcaConfig;
use dcasim::domain::error::DcaError;
use dcasim::domain::price_series::{PricePoint, PriceSeries};
pub use dcasim::domain::quote::{PriceField, RawQuote, RawSeries};
use dcasim::ports::data_port::QuotePort;
use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

pub struct MockQuotePort {
    pub data: HashMap<String, RawSeries>,
    pub errors: HashMap<String, String>,
    pub calls: Rc<Cell<usize>>,
}

impl MockQuotePort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
            calls: Rc::new(Cell::new(0)),
        }
    }

    pub fn with_series(mut self, series: RawSeries) -> Self {
        self.data.insert(series.symbol.clone(), series);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl QuotePort for MockQuotePort {
    fn fetch_quotes(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<RawSeries, DcaError> {
        self.calls.set(self.calls.get() + 1);
        if let Some(reason) = self.errors.get(symbol) {
            return Err(DcaError::DataSource {
                reason: reason.clone(),
            });
        }
        let mut series = self
            .data
            .get(symbol)
            .cloned()
            .unwrap_or_else(|| RawSeries::new(symbol, vec![PriceField::Close], Vec::new()));
        series.quotes.retain(|q| q.date >= start && q.date < end);
        Ok(series)
    }

    fn data_range(&self, symbol: &str) -> Result<Option<(NaiveDate, NaiveDate, usize)>, DcaError> {
        Ok(self.data.get(symbol).and_then(|s| {
            let first = s.quotes.first()?.date;
            let last = s.quotes.last()?.date;
            Some((first, last, s.quotes.len()))
        }))
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn close_quote(date: NaiveDate, close: f64) -> RawQuote {
    RawQuote {
        date,
        adj_close: None,
        close: Some(close),
    }
}

/// Close-only raw series over every day in `[start, start + days)`.
pub fn daily_series(
    symbol: &str,
    start: NaiveDate,
    days: u64,
    price: impl Fn(u64) -> f64,
) -> RawSeries {
    let quotes = (0..days)
        .map(|i| close_quote(start + chrono::Days::new(i), price(i)))
        .collect();
    RawSeries::new(symbol, vec![PriceField::Close], quotes)
}

/// Like [`daily_series`] but without Saturdays and Sundays.
pub fn weekday_series(
    symbol: &str,
    start: NaiveDate,
    days: u64,
    price: impl Fn(u64) -> f64,
) -> RawSeries {
    let mut series = daily_series(symbol, start, days, price);
    series
        .quotes
        .retain(|q| !matches!(q.date.weekday(), Weekday::Sat | Weekday::Sun));
    series
}

pub fn price_series(points: &[(NaiveDate, f64)]) -> PriceSeries {
    PriceSeries::from_points(points.iter().map(|&(date, value)| PricePoint { date, value }))
        .unwrap()
}

pub fn sample_config() -> DcaConfig {
    DcaConfig {
        history_years: 1,
        schedule_day: 5,
        monthly_amount: 1000.0,
        asset: "BTC-USD".into(),
        fx: "USDBRL=X".into(),
    }
}
