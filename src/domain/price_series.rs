//! Composite daily price series.

use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Home-currency price of one unit of the asset on a calendar date.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// Non-empty sequence of price points with strictly increasing dates.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Returns `None` for an empty map.
    pub fn from_map(map: BTreeMap<NaiveDate, f64>) -> Option<Self> {
        if map.is_empty() {
            return None;
        }
        let points = map
            .into_iter()
            .map(|(date, value)| PricePoint { date, value })
            .collect();
        Some(Self { points })
    }

    /// Sorts by date; a later point replaces an earlier one on the same date.
    pub fn from_points(points: impl IntoIterator<Item = PricePoint>) -> Option<Self> {
        Self::from_map(points.into_iter().map(|p| (p.date, p.value)).collect())
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> PricePoint {
        self.points[0]
    }

    pub fn last(&self) -> PricePoint {
        self.points[self.points.len() - 1]
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.position(date).is_ok()
    }

    pub fn price_on(&self, date: NaiveDate) -> Option<f64> {
        self.position(date).ok().map(|i| self.points[i].value)
    }

    /// Points with `from <= date <= to`.
    pub fn between(&self, from: NaiveDate, to: NaiveDate) -> &[PricePoint] {
        if from > to {
            return &[];
        }
        let lo = self.points.partition_point(|p| p.date < from);
        let hi = self.points.partition_point(|p| p.date <= to);
        &self.points[lo..hi]
    }

    fn position(&self, date: NaiveDate) -> Result<usize, usize> {
        self.points.binary_search_by_key(&date, |p| p.date)
    }
}
