use log::{error, info};
use warp::Filter;
use std::net::SocketAddr;
use std::process;
use std::sync::Arc;
use dotenv::dotenv;

use asset_compare::config::AppConfig;
use asset_compare::routes;
use asset_compare::services::history::HistoryStore;

#[tokio::main]
async fn main() {
    dotenv().ok();

    // Initialize the logger
    env_logger::init();
    info!("Logger initialized. Starting the application...");

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {:#}", e);
            process::exit(1);
        }
    };
    info!("Using PORT: {}", config.port);
    if config.live_prices && config.metals_api_key.is_none() {
        info!("METALS_API_KEY not set, comparisons will use static history only");
    }

    // Bind to 0.0.0.0 so the service is reachable inside containers
    let addr: SocketAddr = ([0, 0, 0, 0], config.port).into();
    info!("Will bind to: {}", addr);

    let store = match HistoryStore::load(config) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            error!("Failed to load historical data: {:#}", e);
            process::exit(1);
        }
    };
    if let Some(coverage) = store.coverage() {
        info!("Historical data covers {} to {}", coverage.start_date, coverage.end_date);
    }

    // Set up CORS
    let cors = warp::cors()
        .allow_any_origin()
        .allow_header("content-type")
        .allow_methods(vec!["GET", "POST"]);

    // Set up routes
    let api = routes::routes(store).with(cors);
    info!("Routes configured successfully with CORS.");

    // Start the server
    info!("Starting server on {}", addr);
    warp::serve(api)
        .run(addr)
        .await;
}
