// src/models.rs
use serde::{Serialize, Deserialize};
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::fmt;

/// The three tradable series an investment can be allocated to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    /// S&P 500 total-return index
    #[serde(alias = "stocks")]
    Equity,
    Gold,
    Silver,
}

impl AssetKind {
    pub const ALL: [AssetKind; 3] = [AssetKind::Equity, AssetKind::Gold, AssetKind::Silver];

    pub fn label(&self) -> &'static str {
        match self {
            AssetKind::Equity => "the S&P 500",
            AssetKind::Gold => "gold",
            AssetKind::Silver => "silver",
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let tag = match self {
            AssetKind::Equity => "equity",
            AssetKind::Gold => "gold",
            AssetKind::Silver => "silver",
        };
        write!(f, "{}", tag)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub date: NaiveDate,
    pub price: f64,
}

impl Observation {
    pub fn new(date: NaiveDate, price: f64) -> Self {
        Observation { date, price }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedObservation {
    pub date: NaiveDate,
    pub price: f64,
    /// 100 at the resolved start date
    pub normalized_index: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub real_value: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInput {
    #[serde(default)]
    pub name: Option<String>,
    pub investment_amount: f64,
    pub start_year: i32,
    pub selected_assets: Vec<AssetKind>,
    #[serde(default)]
    pub adjust_for_inflation: bool,
}

impl UserInput {
    /// Selected assets with duplicates dropped, first occurrence wins.
    pub fn assets(&self) -> Vec<AssetKind> {
        let mut seen = Vec::with_capacity(self.selected_assets.len());
        for asset in &self.selected_assets {
            if !seen.contains(asset) {
                seen.push(*asset);
            }
        }
        seen
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssetPerformance {
    pub asset: AssetKind,
    pub start_value: f64,
    pub end_value: f64,
    /// Percentages
    pub total_return: f64,
    pub cagr: f64,
    pub volatility: f64,
    pub max_drawdown: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProjectionScenario {
    pub conservative: f64,
    pub average: f64,
    pub optimistic: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssetProjection {
    pub asset: AssetKind,
    pub current_value: f64,
    pub five_year: ProjectionScenario,
    pub historical_cagr: f64,
    pub historical_volatility: f64,
}

/// Low / average / high projected dollar values for one asset at one date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProjectionBand {
    pub low: f64,
    pub avg: f64,
    pub high: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartDataPoint {
    pub date: NaiveDate,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub values: BTreeMap<AssetKind, f64>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub projections: BTreeMap<AssetKind, ProjectionBand>,
}

impl ChartDataPoint {
    pub fn new(date: NaiveDate) -> Self {
        ChartDataPoint {
            date,
            values: BTreeMap::new(),
            projections: BTreeMap::new(),
        }
    }

    pub fn is_projection(&self) -> bool {
        !self.projections.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonMetadata {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Rounded to the nearest half year
    pub years_invested: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComparisonResult {
    pub user_input: UserInput,
    pub performance: Vec<AssetPerformance>,
    pub projections: Vec<AssetProjection>,
    pub chart_data: Vec<ChartDataPoint>,
    pub metadata: ComparisonMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coverage {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub available_years: Vec<i32>,
}
