// src/services/series.rs
use chrono::{Datelike, NaiveDate};

use crate::models::{AssetKind, Coverage, Observation};
use super::error::ComparisonError;

/// An ascending run of observations for one quantity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Series {
    points: Vec<Observation>,
}

impl Series {
    /// Callers hand over points already sorted by date.
    pub fn new(points: Vec<Observation>) -> Self {
        Series { points }
    }

    pub fn from_unsorted(mut points: Vec<Observation>) -> Self {
        points.sort_by_key(|p| p.date);
        Series { points }
    }

    pub fn points(&self) -> &[Observation] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&Observation> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&Observation> {
        self.points.last()
    }

    /// Nearest observation by absolute day distance. On a tie the earlier
    /// point in scan order wins.
    pub fn find_closest(&self, target: NaiveDate) -> Result<&Observation, ComparisonError> {
        let mut iter = self.points.iter();
        let mut closest = iter.next().ok_or(ComparisonError::EmptySeries)?;
        let mut min_diff = (closest.date - target).num_days().abs();

        for point in iter {
            let diff = (point.date - target).num_days().abs();
            if diff < min_diff {
                min_diff = diff;
                closest = point;
            }
        }

        Ok(closest)
    }

    /// Observations dated within `[start, end]`.
    pub fn range(&self, start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = &Observation> {
        self.points
            .iter()
            .filter(move |p| p.date >= start && p.date <= end)
    }

    pub fn prices_in(&self, start: NaiveDate, end: NaiveDate) -> Vec<f64> {
        self.range(start, end).map(|p| p.price).collect()
    }

    /// Prices of the trailing `n` observations (all of them when shorter).
    pub fn tail_prices(&self, n: usize) -> Vec<f64> {
        let skip = self.points.len().saturating_sub(n);
        self.points[skip..].iter().map(|p| p.price).collect()
    }

    /// Copy of the series carrying `quote`: replaces the price on a matching
    /// date, otherwise inserts in date order.
    pub fn with_quote(&self, quote: Observation) -> Series {
        let mut points = self.points.clone();
        let idx = points.partition_point(|p| p.date < quote.date);
        match points.get_mut(idx) {
            Some(existing) if existing.date == quote.date => existing.price = quote.price,
            _ => points.insert(idx, quote),
        }
        Series { points }
    }
}

/// The read-only bundle every comparison run works against.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssetData {
    pub equity: Series,
    pub gold: Series,
    pub silver: Series,
    /// Price index, used only as a deflator
    pub cpi: Series,
}

impl AssetData {
    pub fn series(&self, asset: AssetKind) -> &Series {
        match asset {
            AssetKind::Equity => &self.equity,
            AssetKind::Gold => &self.gold,
            AssetKind::Silver => &self.silver,
        }
    }

    /// Span covered by the asset series, or `None` when all are empty.
    pub fn coverage(&self) -> Option<Coverage> {
        let start_date = AssetKind::ALL
            .iter()
            .filter_map(|a| self.series(*a).first().map(|p| p.date))
            .min()?;
        let end_date = AssetKind::ALL
            .iter()
            .filter_map(|a| self.series(*a).last().map(|p| p.date))
            .max()?;

        Some(Coverage {
            start_date,
            end_date,
            available_years: (start_date.year()..=end_date.year()).collect(),
        })
    }
}
