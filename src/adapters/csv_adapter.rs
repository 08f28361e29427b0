//! CSV file quote adapter.
//!
//! Reads `<base_path>/<symbol>.csv` in the usual daily market-data export
//! layout (`Date,Open,High,Low,Close,Adj Close,Volume`). Only the date and
//! closing columns are used; either closing column may be absent.

use crate::domain::error::DcaError;
use crate::domain::quote::{PriceField, RawQuote, RawSeries};
use crate::ports::data_port::QuotePort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

pub struct CsvQuoteAdapter {
    base_path: PathBuf,
}

struct Columns {
    date: usize,
    adj_close: Option<usize>,
    close: Option<usize>,
}

impl CsvQuoteAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }

    fn read_all(&self, symbol: &str) -> Result<RawSeries, DcaError> {
        let path = self.csv_path(symbol);
        let content = fs::read_to_string(&path).map_err(|e| DcaError::DataSource {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let headers = rdr.headers().map_err(|e| DcaError::DataSource {
            reason: format!("{}: CSV header error: {}", path.display(), e),
        })?;
        let cols = locate_columns(headers).ok_or_else(|| DcaError::DataSource {
            reason: format!("{}: missing Date column", path.display()),
        })?;

        let mut fields = Vec::new();
        if cols.adj_close.is_some() {
            fields.push(PriceField::AdjClose);
        }
        if cols.close.is_some() {
            fields.push(PriceField::Close);
        }

        let mut quotes = Vec::new();
        for (line, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| DcaError::DataSource {
                reason: format!("{}: CSV parse error: {}", path.display(), e),
            })?;
            let row = line + 2;

            let date_str = record.get(cols.date).unwrap_or_default();
            let date = parse_date(date_str).ok_or_else(|| DcaError::DataSource {
                reason: format!("{} row {}: invalid date {:?}", path.display(), row, date_str),
            })?;

            let value = |idx: Option<usize>, name: &str| -> Result<Option<f64>, DcaError> {
                idx.and_then(|i| record.get(i))
                    .map(|cell| {
                        parse_value(cell).map_err(|_| DcaError::DataSource {
                            reason: format!(
                                "{} row {}: invalid {} value {:?}",
                                path.display(),
                                row,
                                name,
                                cell
                            ),
                        })
                    })
                    .transpose()
                    .map(Option::flatten)
            };

            quotes.push(RawQuote {
                date,
                adj_close: value(cols.adj_close, "Adj Close")?,
                close: value(cols.close, "Close")?,
            });
        }

        quotes.sort_by_key(|q| q.date);
        tracing::debug!(symbol, rows = quotes.len(), path = %path.display(), "read quote file");
        Ok(RawSeries::new(symbol, fields, quotes))
    }
}

fn normalize_header(h: &str) -> String {
    h.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase()
}

fn locate_columns(headers: &csv::StringRecord) -> Option<Columns> {
    let find = |name: &str| headers.iter().position(|h| normalize_header(h) == name);
    Some(Columns {
        date: find("date")?,
        adj_close: find("adjclose"),
        close: find("close"),
    })
}

/// Accepts `YYYY-MM-DD`, optionally followed by a time part.
fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    let day = s.get(..10).unwrap_or(s);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

/// Blank, `null` and `NaN` cells are missing values.
fn parse_value(cell: &str) -> Result<Option<f64>, std::num::ParseFloatError> {
    let cell = cell.trim();
    if cell.is_empty() || cell.eq_ignore_ascii_case("null") || cell.eq_ignore_ascii_case("nan") {
        return Ok(None);
    }
    cell.parse::<f64>().map(Some)
}

impl QuotePort for CsvQuoteAdapter {
    fn fetch_quotes(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<RawSeries, DcaError> {
        let mut series = self.read_all(symbol)?;
        series.quotes.retain(|q| q.date >= start && q.date < end);
        Ok(series)
    }

    fn data_range(&self, symbol: &str) -> Result<Option<(NaiveDate, NaiveDate, usize)>, DcaError> {
        let series = self.read_all(symbol)?;
        Ok(match (series.quotes.first(), series.quotes.last()) {
            (Some(first), Some(last)) => Some((first.date, last.date, series.quotes.len())),
            _ => None,
        })
    }
}
