// src/services/mod.rs
pub mod calculations;
pub mod comparison;
pub mod error;
pub mod history;
pub mod live_prices;
pub mod normalize;
pub mod projection;
pub mod series;

pub use comparison::{compare_investments, run_comparison};
pub use error::ComparisonError;
pub use history::HistoryStore;
pub use series::{AssetData, Series};
