// src/services/comparison.rs
use chrono::{NaiveDate, Months, Utc};
use log::{debug, info};
use std::collections::BTreeMap;

use crate::models::{
    AssetKind, AssetProjection, ChartDataPoint, ComparisonMetadata, ComparisonResult,
    NormalizedObservation, UserInput,
};
use super::calculations::{asset_performance, years_between};
use super::error::ComparisonError;
use super::history::HistoryStore;
use super::normalize::normalize;
use super::projection::{asset_projection, HORIZON_YEARS};
use super::series::AssetData;

const PROJECTION_QUARTERS: u32 = 20;
const MONTHS_PER_QUARTER: u32 = 3;
const DAYS_PER_YEAR: f64 = 365.0;

/// Loads one data snapshot, then runs the comparison up to today.
pub async fn compare_investments(
    input: UserInput,
    store: &HistoryStore,
) -> Result<ComparisonResult, ComparisonError> {
    let data = store.snapshot().await;
    run_comparison(input, &data, Utc::now().date_naive())
}

/// Performance, projections and chart series for `input`, measured from
/// January 1st of the start year up to `today`.
pub fn run_comparison(
    input: UserInput,
    data: &AssetData,
    today: NaiveDate,
) -> Result<ComparisonResult, ComparisonError> {
    let assets = input.assets();
    let start_date = NaiveDate::from_ymd_opt(input.start_year, 1, 1)
        .ok_or(ComparisonError::InvalidStartYear(input.start_year))?;
    let end_date = today;
    let deflator = input.adjust_for_inflation.then_some(&data.cpi);

    info!(
        "Comparing {:?} from {} to {} (amount {}, inflation adjusted: {})",
        assets, start_date, end_date, input.investment_amount, input.adjust_for_inflation
    );

    let performance = assets
        .iter()
        .map(|asset| {
            asset_performance(
                *asset,
                input.investment_amount,
                data.series(*asset),
                start_date,
                end_date,
                deflator,
            )
        })
        .collect::<Result<Vec<_>, _>>()?;

    let projections: Vec<AssetProjection> = assets
        .iter()
        .map(|asset| {
            let current_value = performance
                .iter()
                .find(|p| p.asset == *asset)
                .map(|p| p.end_value)
                .unwrap_or(input.investment_amount);
            asset_projection(*asset, current_value, data.series(*asset))
        })
        .collect();

    let chart_data = chart_series(
        input.investment_amount,
        start_date,
        end_date,
        &assets,
        data,
        &projections,
        deflator.is_some(),
    );

    let years = years_between(start_date, end_date);
    let metadata = ComparisonMetadata {
        start_date,
        end_date,
        years_invested: (years * 2.0).round() / 2.0,
    };
    debug!("Comparison produced {} chart points", chart_data.len());

    Ok(ComparisonResult {
        user_input: input,
        performance,
        projections,
        chart_data,
        metadata,
    })
}

/// Historical dollar values on the densest selected series' dates, followed
/// by quarterly projection bands for the next five years.
fn chart_series(
    investment_amount: f64,
    start_date: NaiveDate,
    end_date: NaiveDate,
    assets: &[AssetKind],
    data: &AssetData,
    projections: &[AssetProjection],
    adjust_for_inflation: bool,
) -> Vec<ChartDataPoint> {
    let deflator = adjust_for_inflation.then_some(&data.cpi);
    let normalized: BTreeMap<AssetKind, Vec<NormalizedObservation>> = AssetKind::ALL
        .iter()
        .map(|asset| (*asset, normalize(data.series(*asset), start_date, end_date, deflator)))
        .collect();

    // Ties keep the earliest selected asset.
    let backbone = assets
        .iter()
        .filter_map(|asset| normalized.get(asset))
        .fold(None::<&Vec<NormalizedObservation>>, |longest, series| match longest {
            Some(current) if current.len() >= series.len() => Some(current),
            _ => Some(series),
        });

    let mut chart = Vec::new();

    for point in backbone.into_iter().flatten() {
        let mut data_point = ChartDataPoint::new(point.date);

        for asset in assets {
            let series = match normalized.get(asset) {
                Some(series) => series,
                None => continue,
            };
            if let Ok(idx) = series.binary_search_by_key(&point.date, |p| p.date) {
                let observed = &series[idx];
                let value = if adjust_for_inflation {
                    observed.real_value.unwrap_or(observed.normalized_index)
                } else {
                    observed.normalized_index
                };
                data_point.values.insert(*asset, value / 100.0 * investment_amount);
            }
        }

        chart.push(data_point);
    }

    let horizon_end = end_date.checked_add_months(Months::new(HORIZON_YEARS as u32 * 12));

    for quarter in 1..=PROJECTION_QUARTERS {
        let date = match end_date.checked_add_months(Months::new(quarter * MONTHS_PER_QUARTER)) {
            Some(date) if Some(date) <= horizon_end => date,
            _ => break,
        };
        let years_from_now = (date - end_date).num_days() as f64 / DAYS_PER_YEAR;

        let mut data_point = ChartDataPoint::new(date);
        for asset in assets {
            if let Some(projection) = projections.iter().find(|p| p.asset == *asset) {
                data_point.projections.insert(*asset, projection.band_at(years_from_now));
            }
        }
        chart.push(data_point);
    }

    chart
}
