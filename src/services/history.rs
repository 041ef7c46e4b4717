// src/services/history.rs
use anyhow::{bail, Context, Result};
use csv::Reader;
use log::{error, info, warn};
use reqwest::Client;
use std::path::Path;

use crate::config::AppConfig;
use crate::models::{Coverage, Observation};
use super::live_prices::{fetch_live_prices, LivePrices};
use super::series::{AssetData, Series};

pub const EQUITY_FILE: &str = "sp500-monthly.csv";
pub const GOLD_FILE: &str = "gold-monthly.csv";
pub const SILVER_FILE: &str = "silver-monthly.csv";
pub const CPI_FILE: &str = "cpi-monthly.csv";

/// Reads a `date,price` CSV file into a series.
pub fn load_series_csv(path: &Path) -> Result<Series> {
    let mut rdr = Reader::from_path(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;

    let mut points = Vec::new();
    for (line, record) in rdr.deserialize::<Observation>().enumerate() {
        let point = record.with_context(|| format!("Bad row {} in {}", line + 2, path.display()))?;
        if !(point.price > 0.0) {
            bail!("Non-positive price {} on {} in {}", point.price, point.date, path.display());
        }
        points.push(point);
    }

    let sorted = points.windows(2).all(|w| w[0].date <= w[1].date);
    if !sorted {
        warn!("{} is not in date order, sorting it", path.display());
    }
    info!("Loaded {} observations from {}", points.len(), path.display());

    Ok(Series::from_unsorted(points))
}

pub fn load_static_history(data_dir: &Path) -> Result<AssetData> {
    Ok(AssetData {
        equity: load_series_csv(&data_dir.join(EQUITY_FILE))?,
        gold: load_series_csv(&data_dir.join(GOLD_FILE))?,
        silver: load_series_csv(&data_dir.join(SILVER_FILE))?,
        cpi: load_series_csv(&data_dir.join(CPI_FILE))?,
    })
}

/// Copy of `history` carrying the live quotes on their quote date.
/// The equity series also takes the estimated S&P 500 level when one was fetched.
pub fn merge_live_prices(history: &AssetData, live: &LivePrices) -> AssetData {
    let equity = match live.sp500 {
        Some(price) => history.equity.with_quote(Observation::new(live.date, price)),
        None => history.equity.clone(),
    };

    AssetData {
        equity,
        gold: history.gold.with_quote(Observation::new(live.date, live.gold)),
        silver: history.silver.with_quote(Observation::new(live.date, live.silver)),
        cpi: history.cpi.clone(),
    }
}

/// Static history loaded once, handed out as per-request snapshots.
pub struct HistoryStore {
    config: AppConfig,
    client: Client,
    history: AssetData,
}

impl HistoryStore {
    pub fn new(config: AppConfig, history: AssetData) -> Self {
        HistoryStore {
            config,
            client: Client::new(),
            history,
        }
    }

    pub fn load(config: AppConfig) -> Result<Self> {
        let history = load_static_history(&config.data_dir)?;
        Ok(Self::new(config, history))
    }

    pub fn history(&self) -> &AssetData {
        &self.history
    }

    pub fn coverage(&self) -> Option<Coverage> {
        self.history.coverage()
    }

    pub async fn live_prices(&self) -> Result<LivePrices> {
        let reference = self.history.equity.last().map(|p| p.price);
        fetch_live_prices(&self.config, &self.client, reference).await
    }

    /// The data a single comparison runs against. Live quotes are merged in
    /// when they can be fetched; any failure falls back to static history.
    pub async fn snapshot(&self) -> AssetData {
        if !self.config.live_prices {
            return self.history.clone();
        }

        match self.live_prices().await {
            Ok(live) => merge_live_prices(&self.history, &live),
            Err(e) => {
                error!("Error loading live prices, falling back to historical data: {:#}", e);
                self.history.clone()
            }
        }
    }
}
