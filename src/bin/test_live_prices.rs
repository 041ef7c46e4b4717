// src/bin/test_live_prices.rs
use asset_compare::config::AppConfig;
use asset_compare::services::history::load_static_history;
use asset_compare::services::live_prices::{fetch_live_metal_prices, fetch_sp500_price_index, estimate_total_return};
use asset_compare::BoxError;
use log::{info, error};
use dotenv::dotenv;
use reqwest::Client;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    dotenv().ok();
    env_logger::init();

    let config = AppConfig::from_env()?;
    let client = Client::new();

    info!("Testing live quote fetching...");

    match config.metals_api_key.as_deref() {
        Some(key) => match fetch_live_metal_prices(&client, &config.metals_api_base_url, key).await {
            Ok(prices) => {
                println!("Gold:   {:>10.2} USD/oz ({})", prices.gold, prices.date);
                println!("Silver: {:>10.2} USD/oz ({})", prices.silver, prices.date);
            }
            Err(e) => error!("ERROR: Failed to fetch metal prices: {:#}", e),
        },
        None => error!("METALS_API_KEY must be set to fetch metal prices"),
    }

    let index = fetch_sp500_price_index(&client, &config.yahoo_chart_url).await?;
    println!("S&P 500 price index: {:.2}", index);

    // The estimate needs the last static total-return level
    match load_static_history(&config.data_dir) {
        Ok(history) => {
            if let Some(last) = history.equity.last() {
                let estimate = estimate_total_return(index, last.price, config.sp500_reference_price);
                println!("S&P 500 total return estimate: {:.2} (reference {:.2} on {})", estimate, last.price, last.date);
            }
        }
        Err(e) => error!("Could not read static history: {:#}", e),
    }

    Ok(())
}
