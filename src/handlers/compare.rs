// src/handlers/compare.rs
use warp::reply::Json;
use warp::Rejection;
use std::sync::Arc;
use log::{error, info};

use crate::models::{Coverage, UserInput};
use crate::services::comparison::compare_investments;
use crate::services::history::HistoryStore;
use super::error::ApiError;

pub const MIN_INVESTMENT: f64 = 100.0;
pub const MAX_INVESTMENT: f64 = 10_000_000.0;

/// Range checks the engine leaves to its caller.
pub fn validate_input(input: &UserInput, coverage: Option<&Coverage>) -> Result<(), ApiError> {
    if !(MIN_INVESTMENT..=MAX_INVESTMENT).contains(&input.investment_amount) {
        return Err(ApiError::bad_request(
            "Please enter a valid investment amount between $100 and $10,000,000",
        ));
    }

    if input.selected_assets.is_empty() {
        return Err(ApiError::bad_request("Select at least one asset to compare"));
    }

    let coverage = coverage.ok_or_else(|| ApiError::comparison_error("No historical data loaded"))?;
    if !coverage.available_years.contains(&input.start_year) {
        return Err(ApiError::bad_request(format!(
            "Start year must be between {} and {}",
            coverage.start_date.format("%Y"),
            coverage.end_date.format("%Y")
        )));
    }

    Ok(())
}

pub async fn post_compare(input: UserInput, store: Arc<HistoryStore>) -> Result<Json, Rejection> {
    info!(
        "Handling comparison request: {:?} from {}",
        input.selected_assets, input.start_year
    );

    validate_input(&input, store.coverage().as_ref()).map_err(warp::reject::custom)?;

    match compare_investments(input, &store).await {
        Ok(result) => {
            info!("Comparison complete with {} chart points", result.chart_data.len());
            Ok(warp::reply::json(&result))
        }
        Err(e) => {
            error!("Comparison failed: {}", e);
            Err(warp::reject::custom(ApiError::comparison_error(format!(
                "Unable to complete the comparison: {}",
                e
            ))))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AssetKind;
    use chrono::NaiveDate;

    fn coverage() -> Coverage {
        Coverage {
            start_date: NaiveDate::from_ymd_opt(1970, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 12, 1).unwrap(),
            available_years: (1970..=2024).collect(),
        }
    }

    fn input(amount: f64, year: i32, assets: Vec<AssetKind>) -> UserInput {
        UserInput {
            name: Some("Ada".to_string()),
            investment_amount: amount,
            start_year: year,
            selected_assets: assets,
            adjust_for_inflation: false,
        }
    }

    #[test]
    fn accepts_bounds_inclusive() {
        let c = coverage();
        assert!(validate_input(&input(100.0, 1970, vec![AssetKind::Gold]), Some(&c)).is_ok());
        assert!(validate_input(&input(10_000_000.0, 2024, vec![AssetKind::Gold]), Some(&c)).is_ok());
    }

    #[test]
    fn rejects_out_of_range_amounts() {
        let c = coverage();
        let err = validate_input(&input(99.99, 2000, vec![AssetKind::Gold]), Some(&c)).unwrap_err();
        assert_eq!(err.status, warp::http::StatusCode::BAD_REQUEST);
        assert!(validate_input(&input(10_000_001.0, 2000, vec![AssetKind::Gold]), Some(&c)).is_err());
        assert!(validate_input(&input(f64::NAN, 2000, vec![AssetKind::Gold]), Some(&c)).is_err());
    }

    #[test]
    fn rejects_empty_selection_and_uncovered_years() {
        let c = coverage();
        assert!(validate_input(&input(1_000.0, 2000, vec![]), Some(&c)).is_err());
        let err = validate_input(&input(1_000.0, 1960, vec![AssetKind::Equity]), Some(&c)).unwrap_err();
        assert!(err.message.contains("1970"));
    }
}
