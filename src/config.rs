// src/config.rs
use anyhow::{Context, Result};
use log::warn;
use std::env;
use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 3030;
pub const DEFAULT_METALS_API_BASE_URL: &str = "https://metals-api.com/api";
pub const DEFAULT_YAHOO_CHART_URL: &str =
    "https://query1.finance.yahoo.com/v8/finance/chart/%5EGSPC?interval=1d&range=1d";
/// Approximate S&P 500 price index level matching the last static total-return point
pub const DEFAULT_SP500_REFERENCE_PRICE: f64 = 5985.0;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub data_dir: PathBuf,
    pub live_prices: bool,
    pub metals_api_key: Option<String>,
    pub metals_api_base_url: String,
    pub yahoo_chart_url: String,
    pub sp500_reference_price: f64,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            port: DEFAULT_PORT,
            data_dir: PathBuf::from("data"),
            live_prices: true,
            metals_api_key: None,
            metals_api_base_url: DEFAULT_METALS_API_BASE_URL.to_string(),
            yahoo_chart_url: DEFAULT_YAHOO_CHART_URL.to_string(),
            sp500_reference_price: DEFAULT_SP500_REFERENCE_PRICE,
        }
    }
}

impl AppConfig {
    /// Reads the environment. Call `dotenv().ok()` first to pick up `.env`.
    pub fn from_env() -> Result<Self> {
        let defaults = AppConfig::default();

        let port = match env::var("PORT") {
            Ok(port) => port.parse().with_context(|| format!("PORT must be a number, got {:?}", port))?,
            Err(_) => {
                warn!("$PORT not set, defaulting to {}", DEFAULT_PORT);
                DEFAULT_PORT
            }
        };

        let live_prices = match env::var("LIVE_PRICES") {
            Ok(flag) => parse_flag(&flag).with_context(|| format!("LIVE_PRICES must be true or false, got {:?}", flag))?,
            Err(_) => defaults.live_prices,
        };

        let sp500_reference_price = match env::var("SP500_REFERENCE_PRICE") {
            Ok(price) => price
                .parse()
                .with_context(|| format!("SP500_REFERENCE_PRICE must be a number, got {:?}", price))?,
            Err(_) => defaults.sp500_reference_price,
        };

        Ok(AppConfig {
            port,
            data_dir: env::var("DATA_DIR").map(PathBuf::from).unwrap_or(defaults.data_dir),
            live_prices,
            metals_api_key: env::var("METALS_API_KEY").ok().filter(|key| !key.trim().is_empty()),
            metals_api_base_url: env::var("METALS_API_BASE_URL").unwrap_or(defaults.metals_api_base_url),
            yahoo_chart_url: env::var("YAHOO_CHART_URL").unwrap_or(defaults.yahoo_chart_url),
            sp500_reference_price,
        })
    }
}

fn parse_flag(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => anyhow::bail!("unrecognised flag value {:?}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_parse_both_ways() {
        assert!(parse_flag("TRUE").unwrap());
        assert!(parse_flag(" on ").unwrap());
        assert!(!parse_flag("0").unwrap());
        assert!(parse_flag("maybe").is_err());
    }

    #[test]
    fn defaults_point_at_public_endpoints() {
        let config = AppConfig::default();
        assert_eq!(config.port, 3030);
        assert!(config.live_prices);
        assert!(config.metals_api_key.is_none());
        assert_eq!(config.metals_api_base_url, DEFAULT_METALS_API_BASE_URL);
    }
}
