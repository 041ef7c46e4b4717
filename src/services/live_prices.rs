// src/services/live_prices.rs
use anyhow::{anyhow, bail, Context, Result};
use chrono::NaiveDate;
use log::{info, warn};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LivePrices {
    /// USD per troy ounce
    pub gold: f64,
    pub silver: f64,
    /// Estimated S&P 500 total-return level
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sp500: Option<f64>,
    pub timestamp: i64,
    pub date: NaiveDate,
}

#[derive(Debug, Deserialize)]
struct MetalsApiResponse {
    success: bool,
    #[serde(default)]
    timestamp: i64,
    date: Option<NaiveDate>,
    #[serde(default)]
    rates: MetalRates,
}

#[derive(Debug, Default, Deserialize)]
struct MetalRates {
    #[serde(rename = "XAU")]
    xau: Option<f64>,
    #[serde(rename = "XAG")]
    xag: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    meta: ChartMeta,
}

#[derive(Debug, Deserialize)]
struct ChartMeta {
    #[serde(rename = "regularMarketPrice")]
    regular_market_price: Option<f64>,
}

/// Gold and silver spot prices. The API quotes ounces per USD, so the rates
/// are inverted.
pub async fn fetch_live_metal_prices(client: &Client, base_url: &str, api_key: &str) -> Result<LivePrices> {
    let url = format!("{}/latest", base_url.trim_end_matches('/'));
    info!("Fetching live metal prices from {}", url);

    let response = client
        .get(&url)
        .query(&[("access_key", api_key), ("base", "USD"), ("symbols", "XAU,XAG")])
        .send()
        .await
        .context("Metals API request failed")?;

    let status = response.status();
    if !status.is_success() {
        bail!("Metals API error: {}", status);
    }

    let data: MetalsApiResponse = response.json().await.context("Malformed Metals API response")?;
    if !data.success {
        bail!("Metals API request was not successful");
    }

    let (gold_rate, silver_rate) = match (data.rates.xau, data.rates.xag) {
        (Some(gold), Some(silver)) if gold > 0.0 && silver > 0.0 => (gold, silver),
        _ => bail!("Missing metal price data in API response"),
    };
    let date = data.date.ok_or_else(|| anyhow!("Metals API response has no date"))?;

    let prices = LivePrices {
        gold: 1.0 / gold_rate,
        silver: 1.0 / silver_rate,
        sp500: None,
        timestamp: data.timestamp,
        date,
    };
    info!("Live gold {:.2}, silver {:.2} as of {}", prices.gold, prices.silver, prices.date);

    Ok(prices)
}

/// Current S&P 500 price index level.
pub async fn fetch_sp500_price_index(client: &Client, chart_url: &str) -> Result<f64> {
    info!("Fetching S&P 500 price index from {}", chart_url);

    let response = client
        .get(chart_url)
        .header("User-Agent", "Mozilla/5.0")
        .send()
        .await
        .context("Yahoo Finance request failed")?;

    let status = response.status();
    if !status.is_success() {
        bail!("Yahoo Finance API error: {}", status);
    }

    let data: ChartResponse = response.json().await.context("Malformed Yahoo Finance response")?;
    data.chart
        .result
        .and_then(|results| results.into_iter().next())
        .and_then(|result| result.meta.regular_market_price)
        .ok_or_else(|| anyhow!("Unable to extract S&P 500 price from response"))
}

/// Scales a known total-return level by the price index growth since then.
pub fn estimate_total_return(price_index: f64, reference_total_return: f64, reference_price_index: f64) -> f64 {
    reference_total_return * (price_index / reference_price_index)
}

/// Live metal quotes plus, when Yahoo answers, an estimated equity level.
pub async fn fetch_live_prices(
    config: &AppConfig,
    client: &Client,
    reference_total_return: Option<f64>,
) -> Result<LivePrices> {
    let api_key = config
        .metals_api_key
        .as_deref()
        .ok_or_else(|| anyhow!("Metals API key not configured"))?;

    let mut prices = fetch_live_metal_prices(client, &config.metals_api_base_url, api_key).await?;

    if let Some(reference) = reference_total_return {
        match fetch_sp500_price_index(client, &config.yahoo_chart_url).await {
            Ok(index) => {
                prices.sp500 = Some(estimate_total_return(index, reference, config.sp500_reference_price));
            }
            Err(e) => warn!("Skipping live S&P 500 quote: {:#}", e),
        }
    }

    Ok(prices)
}
