// src/services/normalize.rs
use chrono::NaiveDate;

use crate::models::NormalizedObservation;
use super::series::Series;

/// Rebases `series` to 100 at `start` and keeps the points inside
/// `[start, end]`. With a deflator each point also gets a real value in
/// start-date purchasing power.
pub fn normalize(
    series: &Series,
    start: NaiveDate,
    end: NaiveDate,
    deflator: Option<&Series>,
) -> Vec<NormalizedObservation> {
    let start_price = match series.find_closest(start) {
        Ok(point) => point.price,
        Err(_) => return Vec::new(),
    };

    // Real values need a usable deflator level at the start date.
    let start_deflator = deflator.and_then(|cpi| {
        cpi.find_closest(start)
            .ok()
            .map(|p| p.price)
            .filter(|price| *price > 0.0)
            .map(|price| (cpi, price))
    });

    series
        .range(start, end)
        .map(|point| {
            let normalized_index = point.price / start_price * 100.0;

            let real_value = start_deflator.and_then(|(cpi, start_level)| {
                cpi.find_closest(point.date)
                    .ok()
                    .map(|p| p.price)
                    .filter(|current| *current > 0.0)
                    .map(|current| normalized_index * (start_level / current))
            });

            NormalizedObservation {
                date: point.date,
                price: point.price,
                normalized_index,
                real_value,
            }
        })
        .collect()
}
