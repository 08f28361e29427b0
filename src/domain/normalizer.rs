//! Composite price series construction.
//!
//! The asset is quoted in an intermediate currency; the exchange-rate series
//! converts that currency into the home currency. Both are restricted to
//! `[start, end)`, outer-joined on date, forward-filled per column and
//! multiplied. Dates that still lack either value are dropped.

use crate::domain::error::DcaError;
use crate::domain::price_series::PriceSeries;
use crate::domain::quote::RawSeries;
use chrono::NaiveDate;
use std::collections::BTreeMap;

pub fn normalize(
    asset: &RawSeries,
    fx: &RawSeries,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<PriceSeries, DcaError> {
    let asset_col = select_closes(asset, start, end)?;
    let fx_col = select_closes(fx, start, end)?;

    let mut joined: BTreeMap<NaiveDate, (Option<f64>, Option<f64>)> = BTreeMap::new();
    for (&date, &v) in &asset_col {
        joined.entry(date).or_default().0 = Some(v);
    }
    for (&date, &v) in &fx_col {
        joined.entry(date).or_default().1 = Some(v);
    }

    let mut last_asset = None;
    let mut last_fx = None;
    let mut composite = BTreeMap::new();
    for (date, (a, r)) in joined {
        last_asset = a.or(last_asset);
        last_fx = r.or(last_fx);
        if let (Some(a), Some(r)) = (last_asset, last_fx) {
            let price = a * r;
            if price.is_finite() {
                composite.insert(date, price);
            }
        }
    }

    tracing::debug!(
        asset = %asset.symbol,
        fx = %fx.symbol,
        asset_rows = asset_col.len(),
        fx_rows = fx_col.len(),
        composite_rows = composite.len(),
        "normalized price series"
    );

    PriceSeries::from_map(composite).ok_or_else(|| DcaError::EmptyResult {
        asset: asset.symbol.clone(),
        fx: fx.symbol.clone(),
        start,
        end,
    })
}

fn select_closes(
    raw: &RawSeries,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<BTreeMap<NaiveDate, f64>, DcaError> {
    let unavailable = |reason: &str| DcaError::DataUnavailable {
        symbol: raw.symbol.clone(),
        start,
        end,
        reason: reason.to_string(),
    };

    if raw.quotes.is_empty() {
        return Err(unavailable("no rows returned"));
    }
    let field = raw
        .best_field()
        .ok_or_else(|| unavailable("neither Adj Close nor Close present"))?;

    let mut col = raw.column(field);
    col.retain(|d, _| *d >= start && *d < end);
    tracing::debug!(symbol = %raw.symbol, %field, rows = col.len(), "selected close column");
    Ok(col)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::quote::{PriceField, RawQuote};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn close_series(symbol: &str, rows: &[(u32, f64)]) -> RawSeries {
        RawSeries::new(
            symbol,
            vec![PriceField::Close],
            rows.iter()
                .map(|&(d, v)| RawQuote {
                    date: date(2024, 1, d),
                    adj_close: None,
                    close: Some(v),
                })
                .collect(),
        )
    }

    fn jan() -> (NaiveDate, NaiveDate) {
        (date(2024, 1, 1), date(2024, 2, 1))
    }

    #[test]
    fn multiplies_aligned_dates() {
        let (s, e) = jan();
        let asset = close_series("A", &[(2, 100.0), (3, 110.0)]);
        let fx = close_series("F", &[(2, 5.0), (3, 4.0)]);
        let out = normalize(&asset, &fx, s, e).unwrap();
        assert_eq!(out.price_on(date(2024, 1, 2)), Some(500.0));
        assert_eq!(out.price_on(date(2024, 1, 3)), Some(440.0));
    }

    #[test]
    fn forward_fills_fx_over_weekend() {
        let (s, e) = jan();
        // 2024-01-06/07 is a weekend: asset trades, FX does not.
        let asset = close_series("A", &[(5, 100.0), (6, 101.0), (7, 102.0), (8, 103.0)]);
        let fx = close_series("F", &[(5, 5.0), (8, 6.0)]);
        let out = normalize(&asset, &fx, s, e).unwrap();
        assert_eq!(out.price_on(date(2024, 1, 6)), Some(505.0));
        assert_eq!(out.price_on(date(2024, 1, 7)), Some(510.0));
        assert_eq!(out.price_on(date(2024, 1, 8)), Some(618.0));
    }

    #[test]
    fn forward_fills_asset_gap() {
        let (s, e) = jan();
        let asset = close_series("A", &[(2, 100.0)]);
        let fx = close_series("F", &[(2, 2.0), (3, 3.0)]);
        let out = normalize(&asset, &fx, s, e).unwrap();
        assert_eq!(out.price_on(date(2024, 1, 3)), Some(300.0));
    }

    #[test]
    fn drops_leading_dates_without_fx() {
        let (s, e) = jan();
        let asset = close_series("A", &[(1, 100.0), (2, 100.0)]);
        let fx = close_series("F", &[(2, 5.0)]);
        let out = normalize(&asset, &fx, s, e).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out.first().date, date(2024, 1, 2));
    }

    #[test]
    fn prefers_adjusted_close() {
        let (s, e) = jan();
        let asset = RawSeries::new(
            "A",
            vec![PriceField::AdjClose, PriceField::Close],
            vec![RawQuote {
                date: date(2024, 1, 2),
                adj_close: Some(90.0),
                close: Some(100.0),
            }],
        );
        let fx = close_series("F", &[(2, 1.0)]);
        let out = normalize(&asset, &fx, s, e).unwrap();
        assert_eq!(out.price_on(date(2024, 1, 2)), Some(90.0));
    }

    #[test]
    fn end_date_is_exclusive() {
        let asset = close_series("A", &[(2, 1.0), (3, 1.0)]);
        let fx = close_series("F", &[(2, 1.0), (3, 1.0)]);
        let out = normalize(&asset, &fx, date(2024, 1, 1), date(2024, 1, 3)).unwrap();
        assert_eq!(out.last().date, date(2024, 1, 2));
    }

    #[test]
    fn empty_input_is_data_unavailable() {
        let (s, e) = jan();
        let asset = close_series("A", &[]);
        let fx = close_series("F", &[(2, 1.0)]);
        let err = normalize(&asset, &fx, s, e).unwrap_err();
        assert!(matches!(err, DcaError::DataUnavailable { symbol, .. } if symbol == "A"));
    }

    #[test]
    fn missing_price_columns_is_data_unavailable() {
        let (s, e) = jan();
        let asset = close_series("A", &[(2, 1.0)]);
        let fx = RawSeries::new(
            "F",
            vec![],
            vec![RawQuote {
                date: date(2024, 1, 2),
                adj_close: None,
                close: None,
            }],
        );
        let err = normalize(&asset, &fx, s, e).unwrap_err();
        assert!(matches!(err, DcaError::DataUnavailable { symbol, .. } if symbol == "F"));
    }

    #[test]
    fn no_overlap_is_empty_result() {
        let (s, e) = jan();
        // The only FX quote falls outside the window.
        let asset = close_series("A", &[(2, 1.0)]);
        let fx = RawSeries::new(
            "F",
            vec![PriceField::Close],
            vec![RawQuote {
                date: date(2024, 3, 1),
                adj_close: None,
                close: Some(1.0),
            }],
        );
        let err = normalize(&asset, &fx, s, e).unwrap_err();
        assert!(matches!(err, DcaError::EmptyResult { .. }));
    }
}
