// src/services/calculations.rs
use chrono::{Datelike, NaiveDate};
use log::debug;

use crate::models::{AssetKind, AssetPerformance};
use super::error::ComparisonError;
use super::series::Series;

const MONTHS_PER_YEAR: f64 = 12.0;

pub fn total_return_pct(initial: f64, final_value: f64) -> f64 {
    (final_value - initial) / initial * 100.0
}

/// Zero for a zero-length period. Expects `initial > 0`.
pub fn cagr_pct(initial: f64, final_value: f64, years: f64) -> f64 {
    if years == 0.0 {
        0.0
    } else {
        ((final_value / initial).powf(1.0 / years) - 1.0) * 100.0
    }
}

/// Annualized standard deviation of simple period-over-period returns,
/// treating each step as one month. Population variance.
pub fn volatility_pct(prices: &[f64]) -> f64 {
    if prices.len() < 2 {
        return 0.0;
    }

    let returns: Vec<f64> = prices
        .windows(2)
        .map(|w| (w[1] - w[0]) / w[0])
        .collect();

    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n;

    variance.sqrt() * MONTHS_PER_YEAR.sqrt() * 100.0
}

/// Largest peak-to-trough decline, in percent of the running peak.
pub fn max_drawdown_pct(prices: &[f64]) -> f64 {
    if prices.len() < 2 {
        return 0.0;
    }

    let mut peak = prices[0];
    let mut max_drawdown = 0.0_f64;

    for &price in prices {
        if price > peak {
            peak = price;
        }
        let drawdown = (peak - price) / peak * 100.0;
        if drawdown > max_drawdown {
            max_drawdown = drawdown;
        }
    }

    max_drawdown
}

/// Whole months from `start` to `end`; a partial trailing month is not counted.
pub fn months_between(start: NaiveDate, end: NaiveDate) -> i32 {
    if end < start {
        return -months_between(end, start);
    }
    let mut months = (end.year() - start.year()) * 12 + end.month() as i32 - start.month() as i32;
    if end.day() < start.day() {
        months -= 1;
    }
    months
}

/// Fractional years as month count / 12.
pub fn years_between(start: NaiveDate, end: NaiveDate) -> f64 {
    months_between(start, end) as f64 / MONTHS_PER_YEAR
}

pub fn asset_performance(
    asset: AssetKind,
    initial_investment: f64,
    series: &Series,
    start: NaiveDate,
    end: NaiveDate,
    deflator: Option<&Series>,
) -> Result<AssetPerformance, ComparisonError> {
    let missing = |_| ComparisonError::MissingRangeData { asset };
    let start_point = series.find_closest(start).map_err(missing)?;
    let end_point = series.find_closest(end).map_err(missing)?;

    let start_price = start_point.price;
    let mut end_price = end_point.price;

    // Restate the end price in start-date purchasing power.
    if let Some(cpi) = deflator {
        if let (Ok(start_cpi), Ok(end_cpi)) = (cpi.find_closest(start), cpi.find_closest(end)) {
            if start_cpi.price > 0.0 && end_cpi.price > 0.0 {
                end_price = end_point.price * (start_cpi.price / end_cpi.price);
            }
        }
    }

    let final_value = initial_investment * (end_price / start_price);
    let years = years_between(start, end);

    // Dispersion is always measured on nominal prices.
    let prices = series.prices_in(start, end);

    let performance = AssetPerformance {
        asset,
        start_value: initial_investment,
        end_value: final_value,
        total_return: total_return_pct(initial_investment, final_value),
        cagr: cagr_pct(initial_investment, final_value, years),
        volatility: volatility_pct(&prices),
        max_drawdown: max_drawdown_pct(&prices),
    };
    debug!("Performance for {} over {:.2} years: {:?}", asset, years, performance);

    Ok(performance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Observation;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn total_return_basics() {
        assert!(close(total_return_pct(100.0, 150.0), 50.0));
        assert!(close(total_return_pct(80.0, 40.0), -50.0));
        assert_eq!(total_return_pct(123.0, 123.0), 0.0);
    }

    #[test]
    fn cagr_edge_cases() {
        assert_eq!(cagr_pct(100.0, 500.0, 0.0), 0.0);
        assert!(close(cagr_pct(100.0, 200.0, 1.0), 100.0));
        assert_eq!(cagr_pct(100.0, 100.0, 10.0), 0.0);
        assert!(close(cagr_pct(100.0, 0.0, 5.0), -100.0));
    }

    #[test]
    fn volatility_needs_two_points() {
        assert_eq!(volatility_pct(&[]), 0.0);
        assert_eq!(volatility_pct(&[100.0]), 0.0);
    }

    #[test]
    fn volatility_of_constant_growth_is_zero() {
        let prices = [100.0, 110.0, 121.0, 133.1];
        assert!(volatility_pct(&prices) < 1e-9);
    }

    #[test]
    fn volatility_uses_population_variance() {
        // Returns +10% and -10%: mean 0, population std-dev 0.1
        let prices = [100.0, 110.0, 99.0];
        let expected = 0.1 * 12f64.sqrt() * 100.0;
        assert!(close(volatility_pct(&prices), expected));
    }

    #[test]
    fn drawdown_cases() {
        assert_eq!(max_drawdown_pct(&[100.0, 110.0, 120.0]), 0.0);
        assert!(close(max_drawdown_pct(&[100.0, 50.0, 100.0]), 50.0));
        assert!(close(max_drawdown_pct(&[100.0, 200.0, 150.0, 50.0, 300.0]), 75.0));
        assert_eq!(max_drawdown_pct(&[100.0]), 0.0);
    }

    #[test]
    fn months_between_counts_whole_months() {
        assert_eq!(months_between(d(1990, 1, 1), d(2020, 1, 1)), 360);
        assert_eq!(months_between(d(2020, 1, 15), d(2020, 3, 14)), 1);
        assert_eq!(months_between(d(2020, 1, 15), d(2020, 3, 15)), 2);
        assert_eq!(months_between(d(2020, 3, 15), d(2020, 1, 15)), -2);
        assert!(close(years_between(d(2000, 1, 1), d(2001, 7, 1)), 1.5));
    }

    fn gold() -> Series {
        Series::new(vec![
            Observation::new(d(1990, 1, 1), 100.0),
            Observation::new(d(2000, 1, 1), 200.0),
            Observation::new(d(2020, 1, 1), 800.0),
        ])
    }

    #[test]
    fn asset_performance_nominal() {
        let perf = asset_performance(AssetKind::Gold, 10_000.0, &gold(), d(1990, 1, 1), d(2020, 1, 1), None)
            .unwrap();

        assert_eq!(perf.start_value, 10_000.0);
        assert!(close(perf.end_value, 80_000.0));
        assert!(close(perf.total_return, 700.0));
        assert!(close(perf.cagr, (8f64.powf(1.0 / 30.0) - 1.0) * 100.0));
        assert!((perf.cagr - 7.18).abs() < 0.01);
        assert_eq!(perf.max_drawdown, 0.0);
    }

    #[test]
    fn asset_performance_deflates_end_value_only() {
        let cpi = Series::new(vec![
            Observation::new(d(1990, 1, 1), 100.0),
            Observation::new(d(2020, 1, 1), 200.0),
        ]);
        let nominal = asset_performance(AssetKind::Gold, 10_000.0, &gold(), d(1990, 1, 1), d(2020, 1, 1), None)
            .unwrap();
        let real = asset_performance(AssetKind::Gold, 10_000.0, &gold(), d(1990, 1, 1), d(2020, 1, 1), Some(&cpi))
            .unwrap();

        assert!(close(real.end_value, 40_000.0));
        assert!(close(real.total_return, 300.0));
        assert_eq!(real.volatility, nominal.volatility);
        assert_eq!(real.max_drawdown, nominal.max_drawdown);
    }

    #[test]
    fn asset_performance_ignores_empty_deflator() {
        let perf = asset_performance(
            AssetKind::Gold,
            10_000.0,
            &gold(),
            d(1990, 1, 1),
            d(2020, 1, 1),
            Some(&Series::default()),
        )
        .unwrap();
        assert!(close(perf.end_value, 80_000.0));
    }

    #[test]
    fn asset_performance_on_empty_series_fails() {
        let err = asset_performance(AssetKind::Silver, 1_000.0, &Series::default(), d(2000, 1, 1), d(2010, 1, 1), None)
            .unwrap_err();
        assert_eq!(err, ComparisonError::MissingRangeData { asset: AssetKind::Silver });
    }

    #[test]
    fn same_day_range_has_zero_cagr() {
        let perf = asset_performance(AssetKind::Gold, 500.0, &gold(), d(2000, 1, 1), d(2000, 1, 1), None).unwrap();
        assert_eq!(perf.cagr, 0.0);
        assert!(close(perf.end_value, 500.0));
    }
}
