// src/services/error.rs
use thiserror::Error;

use crate::models::AssetKind;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ComparisonError {
    #[error("Cannot resolve a date against an empty series")]
    EmptySeries,

    #[error("Unable to find data for {asset} in the specified range")]
    MissingRangeData { asset: AssetKind },

    #[error("Start year {0} does not name a valid date")]
    InvalidStartYear(i32),
}
