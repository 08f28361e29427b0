//! Raw quote source port.

use crate::domain::error::DcaError;
use crate::domain::quote::RawSeries;
use chrono::NaiveDate;

pub trait QuotePort {
    /// Daily quotes for `symbol` with `start <= date < end`.
    fn fetch_quotes(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<RawSeries, DcaError>;

    /// First date, last date and row count available for `symbol`.
    fn data_range(&self, symbol: &str) -> Result<Option<(NaiveDate, NaiveDate, usize)>, DcaError>;
}
