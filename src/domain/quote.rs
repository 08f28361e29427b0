//! Raw daily quotes as delivered by a market-data source.

use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::fmt;

/// Closing-price columns a raw source may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PriceField {
    AdjClose,
    Close,
}

impl fmt::Display for PriceField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriceField::AdjClose => write!(f, "Adj Close"),
            PriceField::Close => write!(f, "Close"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawQuote {
    pub date: NaiveDate,
    pub adj_close: Option<f64>,
    pub close: Option<f64>,
}

impl RawQuote {
    pub fn value(&self, field: PriceField) -> Option<f64> {
        match field {
            PriceField::AdjClose => self.adj_close,
            PriceField::Close => self.close,
        }
    }
}

/// One instrument's raw quotes. `fields` lists the columns the source
/// provided at all, independent of whether individual rows are filled.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSeries {
    pub symbol: String,
    pub fields: Vec<PriceField>,
    pub quotes: Vec<RawQuote>,
}

impl RawSeries {
    pub fn new(symbol: impl Into<String>, fields: Vec<PriceField>, quotes: Vec<RawQuote>) -> Self {
        Self {
            symbol: symbol.into(),
            fields,
            quotes,
        }
    }

    /// Adjusted close when the column exists, else close, else `None`.
    pub fn best_field(&self) -> Option<PriceField> {
        [PriceField::AdjClose, PriceField::Close]
            .into_iter()
            .find(|f| self.fields.contains(f))
    }

    /// Values of `field` by date, ascending. Missing and non-finite values
    /// are dropped; on duplicate dates the last row wins.
    pub fn column(&self, field: PriceField) -> BTreeMap<NaiveDate, f64> {
        self.quotes
            .iter()
            .filter_map(|q| q.value(field).filter(|v| v.is_finite()).map(|v| (q.date, v)))
            .collect()
    }
}
