// src/handlers/coverage.rs
use warp::reply::Json;
use warp::Rejection;
use std::sync::Arc;
use log::info;

use crate::services::history::HistoryStore;
use super::error::ApiError;

pub async fn get_coverage(store: Arc<HistoryStore>) -> Result<Json, Rejection> {
    info!("Handling request to get data coverage");

    let coverage = store
        .coverage()
        .ok_or_else(|| warp::reject::custom(ApiError::comparison_error("No historical data loaded")))?;

    Ok(warp::reply::json(&coverage))
}
