// src/handlers/metals.rs
use warp::reply::Json;
use warp::Rejection;
use std::sync::Arc;
use log::{error, info};

use crate::services::history::HistoryStore;
use super::error::ApiError;

pub async fn get_metal_prices(store: Arc<HistoryStore>) -> Result<Json, Rejection> {
    info!("Handling request to get live metal prices");

    match store.live_prices().await {
        Ok(prices) => Ok(warp::reply::json(&prices)),
        Err(e) => {
            error!("Error fetching metal prices: {:#}", e);
            Err(warp::reject::custom(ApiError::external_error("Failed to fetch metal prices")))
        }
    }
}
