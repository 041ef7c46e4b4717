// src/services/projection.rs
use chrono::Months;
use log::{debug, warn};

use crate::models::{AssetKind, AssetProjection, ProjectionBand, ProjectionScenario};
use super::calculations::{cagr_pct, volatility_pct, years_between};
use super::series::Series;

pub const HISTORY_YEARS: u32 = 50;
pub const HORIZON_YEARS: f64 = 5.0;
/// Monthly observations in the trailing history window
const HISTORY_MONTHS: usize = HISTORY_YEARS as usize * 12;

/// CAGR (percent) from the observation nearest `years_back` before the last
/// one, up to the last one.
pub fn historical_cagr(series: &Series, years_back: u32) -> f64 {
    let anchor = match series.last() {
        Some(point) => point,
        None => return 0.0,
    };

    let target = match anchor.date.checked_sub_months(Months::new(years_back * 12)) {
        Some(date) => date,
        None => {
            warn!("Cannot go back {} years from {}", years_back, anchor.date);
            return 0.0;
        }
    };

    match series.find_closest(target) {
        Ok(start) => {
            let years = years_between(start.date, anchor.date);
            cagr_pct(start.price, anchor.price, years)
        }
        Err(_) => 0.0,
    }
}

/// Value of `current_value` compounded at `rate_pct` for `years`.
/// A growth base below zero is floored at zero.
pub fn compound(current_value: f64, rate_pct: f64, years: f64) -> f64 {
    let base = (1.0 + rate_pct / 100.0).max(0.0);
    current_value * base.powf(years)
}

/// The mean growth rate with a one-standard-deviation band either side.
pub fn projection_band(current_value: f64, cagr: f64, volatility: f64, years: f64) -> ProjectionBand {
    ProjectionBand {
        low: compound(current_value, cagr - volatility, years),
        avg: compound(current_value, cagr, years),
        high: compound(current_value, cagr + volatility, years),
    }
}

pub fn project(current_value: f64, cagr: f64, volatility: f64, horizon_years: f64) -> ProjectionScenario {
    let band = projection_band(current_value, cagr, volatility, horizon_years);
    ProjectionScenario {
        conservative: band.low,
        average: band.avg,
        optimistic: band.high,
    }
}

pub fn asset_projection(asset: AssetKind, current_value: f64, series: &Series) -> AssetProjection {
    let historical_cagr = historical_cagr(series, HISTORY_YEARS);
    let historical_volatility = volatility_pct(&series.tail_prices(HISTORY_MONTHS));
    debug!(
        "{} projection basis: cagr {:.2}%, volatility {:.2}%",
        asset, historical_cagr, historical_volatility
    );

    AssetProjection {
        asset,
        current_value,
        five_year: project(current_value, historical_cagr, historical_volatility, HORIZON_YEARS),
        historical_cagr,
        historical_volatility,
    }
}

impl AssetProjection {
    /// Projected band `years` after now, on the same curve as `five_year`.
    pub fn band_at(&self, years: f64) -> ProjectionBand {
        projection_band(self.current_value, self.historical_cagr, self.historical_volatility, years)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Observation;
    use chrono::NaiveDate;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn zero_horizon_returns_current_value() {
        let p = project(1_234.0, 8.0, 15.0, 0.0);
        assert_eq!(p.conservative, 1_234.0);
        assert_eq!(p.average, 1_234.0);
        assert_eq!(p.optimistic, 1_234.0);
    }

    #[test]
    fn scenarios_straddle_the_average() {
        let p = project(10_000.0, 7.0, 15.0, 5.0);
        assert!(close(p.average, 10_000.0 * 1.07f64.powi(5)));
        assert!(close(p.conservative, 10_000.0 * 0.92f64.powi(5)));
        assert!(close(p.optimistic, 10_000.0 * 1.22f64.powi(5)));
        assert!(p.conservative < p.average && p.average < p.optimistic);
    }

    #[test]
    fn collapsing_scenario_floors_at_zero() {
        let p = project(1_000.0, 10.0, 150.0, 5.0);
        assert_eq!(p.conservative, 0.0);
    }

    #[test]
    fn historical_cagr_on_empty_series_is_zero() {
        assert_eq!(historical_cagr(&Series::default(), 50), 0.0);
    }

    #[test]
    fn historical_cagr_uses_nearest_start() {
        let series = Series::new(vec![
            Observation::new(d(1990, 1, 1), 100.0),
            Observation::new(d(2000, 1, 1), 200.0),
            Observation::new(d(2020, 1, 1), 800.0),
        ]);
        // 15 years back from 2020 lands on 2005; nearest is 2000.
        assert!(close(historical_cagr(&series, 15), (4f64.powf(1.0 / 20.0) - 1.0) * 100.0));
        // 50 years back resolves to the first point.
        assert!(close(historical_cagr(&series, 50), (8f64.powf(1.0 / 30.0) - 1.0) * 100.0));
    }

    #[test]
    fn band_at_five_years_matches_five_year_projection() {
        let series = Series::new(
            (0..120)
                .map(|i| {
                    let date = d(2010, 1, 1).checked_add_months(Months::new(i)).unwrap();
                    let wobble = if i % 2 == 0 { 1.01 } else { 0.995 };
                    Observation::new(date, 100.0 * 1.005f64.powi(i as i32) * wobble)
                })
                .collect(),
        );
        let projection = asset_projection(AssetKind::Equity, 5_000.0, &series);
        let band = projection.band_at(HORIZON_YEARS);

        assert!(projection.historical_volatility > 0.0);
        assert!(close(band.low, projection.five_year.conservative));
        assert!(close(band.avg, projection.five_year.average));
        assert!(close(band.high, projection.five_year.optimistic));
    }

    #[test]
    fn volatility_ignores_points_before_the_trailing_window() {
        let prices: Vec<f64> = (0..700)
            .map(|i| match i {
                i if i < 100 && i % 2 == 0 => 50.0,
                i if i < 100 => 400.0,
                i => 100.0 * 1.004f64.powi(i) * if i % 3 == 0 { 1.02 } else { 0.99 },
            })
            .collect();
        let series = Series::new(
            prices
                .iter()
                .enumerate()
                .map(|(i, price)| {
                    let date = d(1960, 1, 1).checked_add_months(Months::new(i as u32)).unwrap();
                    Observation::new(date, *price)
                })
                .collect(),
        );

        let projection = asset_projection(AssetKind::Gold, 1_000.0, &series);

        assert!(close(projection.historical_volatility, volatility_pct(&prices[100..])));
        assert!(projection.historical_volatility < volatility_pct(&prices));
    }
}
