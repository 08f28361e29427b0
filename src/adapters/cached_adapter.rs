//! Memoizing wrapper around another quote source.
//!
//! Repeated simulations over the same window (e.g. a schedule-day sweep)
//! fetch each `(symbol, start, end)` once. Failures are not cached.

use crate::domain::error::DcaError;
use crate::domain::quote::RawSeries;
use crate::ports::data_port::QuotePort;
use chrono::NaiveDate;
use std::cell::RefCell;
use std::collections::HashMap;

type CacheKey = (String, NaiveDate, NaiveDate);

pub struct CachedQuotePort<P> {
    inner: P,
    cache: RefCell<HashMap<CacheKey, RawSeries>>,
}

impl<P: QuotePort> CachedQuotePort<P> {
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            cache: RefCell::new(HashMap::new()),
        }
    }

    pub fn cached_entries(&self) -> usize {
        self.cache.borrow().len()
    }
}

impl<P: QuotePort> QuotePort for CachedQuotePort<P> {
    fn fetch_quotes(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<RawSeries, DcaError> {
        let key = (symbol.to_string(), start, end);
        if let Some(hit) = self.cache.borrow().get(&key) {
            tracing::debug!(symbol, %start, %end, "quote cache hit");
            return Ok(hit.clone());
        }
        let series = self.inner.fetch_quotes(symbol, start, end)?;
        self.cache.borrow_mut().insert(key, series.clone());
        Ok(series)
    }

    fn data_range(&self, symbol: &str) -> Result<Option<(NaiveDate, NaiveDate, usize)>, DcaError> {
        self.inner.data_range(symbol)
    }
}
