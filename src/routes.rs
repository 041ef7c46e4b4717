// src/routes.rs
use std::sync::Arc;
use warp::reject::Rejection;
use crate::handlers::{compare::post_compare, coverage::get_coverage, metals::get_metal_prices};
use crate::services::history::HistoryStore;
use log::info;

use std::convert::Infallible;
use warp::http::StatusCode;
use warp::{Filter, Reply};
use crate::handlers::error::ApiError;

/// Request bodies are small JSON documents.
const MAX_BODY_BYTES: u64 = 16 * 1024;

async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let code;
    let message;

    if err.is_not_found() {
        code = StatusCode::NOT_FOUND;
        message = "Not Found".to_string();
    } else if let Some(api_error) = err.find::<ApiError>() {
        code = api_error.status;
        message = api_error.message.clone();
    } else if let Some(body_error) = err.find::<warp::filters::body::BodyDeserializeError>() {
        code = StatusCode::BAD_REQUEST;
        message = format!("Invalid request body: {}", body_error);
    } else if err.find::<warp::reject::LengthRequired>().is_some() {
        code = StatusCode::LENGTH_REQUIRED;
        message = "Content-Length header is required".to_string();
    } else if err.find::<warp::reject::PayloadTooLarge>().is_some() {
        code = StatusCode::PAYLOAD_TOO_LARGE;
        message = format!("Request body exceeds {} bytes", MAX_BODY_BYTES);
    } else if err.find::<warp::reject::UnsupportedMediaType>().is_some() {
        code = StatusCode::UNSUPPORTED_MEDIA_TYPE;
        message = "Expected a JSON request body".to_string();
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        code = StatusCode::METHOD_NOT_ALLOWED;
        message = "Method Not Allowed".to_string();
    } else {
        code = StatusCode::INTERNAL_SERVER_ERROR;
        message = "Internal Server Error".to_string();
    }

    Ok(warp::reply::with_status(
        warp::reply::json(&serde_json::json!({
            "error": message,
        })),
        code,
    ))
}

pub fn routes(store: Arc<HistoryStore>) -> impl Filter<Extract = impl Reply, Error = Infallible> + Clone {
    info!("Configuring routes...");

    let store_filter = warp::any().map(move || store.clone());

    let compare_route = warp::path!("api" / "v1" / "compare")
        .and(warp::post())
        .and(warp::body::content_length_limit(MAX_BODY_BYTES))
        .and(warp::body::json())
        .and(store_filter.clone())
        .and_then(post_compare);

    let metals_route = warp::path!("api" / "v1" / "metals")
        .and(warp::get())
        .and(store_filter.clone())
        .and_then(get_metal_prices);

    let coverage_route = warp::path!("api" / "v1" / "coverage")
        .and(warp::get())
        .and(store_filter.clone())
        .and_then(get_coverage);

    info!("All routes configured successfully.");

    compare_route
        .or(metals_route)
        .or(coverage_route)
        .recover(handle_rejection)
}
