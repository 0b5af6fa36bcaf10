//! Market statistics over an immutable property snapshot.
//!
//! Every function here is pure: the same snapshot always yields the same
//! result and nothing is retained between calls. Memoization lives in
//! [`crate::market::MarketAnalysis`].
//!
//! | Operation | Required fields | Output |
//! |-----------|-----------------|--------|
//! | [`compute_overall`] | valid price | [`MarketStats`] |
//! | [`compute_trend`] | valid price, year built | ascending [`TrendPoint`]s |
//! | [`compute_segments`] | bedrooms (valid price per segment) | [`BedroomSegments`] |

use std::collections::BTreeMap;

use tracing::debug;

use crate::{BedroomSegments, CoreError, MarketStats, PropertyRecord, TrendPoint};

/// Overall statistics over the valid records of `records`.
///
/// # Errors
///
/// [`CoreError::DataUnavailable`] when the snapshot is empty, and with a
/// different message when no record has a valid price.
pub fn compute_overall(records: &[PropertyRecord]) -> Result<MarketStats, CoreError> {
    if records.is_empty() {
        return Err(CoreError::data_unavailable(
            "no property data available for statistics calculation",
        ));
    }

    let valid = valid_records(records);
    debug!(
        total = records.len(),
        valid = valid.len(),
        "filtered records for overall statistics"
    );

    summarize(&valid).ok_or_else(|| {
        CoreError::data_unavailable("no valid property data available after filtering")
    })
}

/// Average price per construction year, ascending by year.
///
/// # Errors
///
/// [`CoreError::DataUnavailable`] when no record is valid for trend.
pub fn compute_trend(records: &[PropertyRecord]) -> Result<Vec<TrendPoint>, CoreError> {
    if records.is_empty() {
        return Err(CoreError::data_unavailable(
            "no property data available for trend calculation",
        ));
    }

    let mut by_year: BTreeMap<i32, (f64, u64)> = BTreeMap::new();
    for record in records {
        let (Some(year), Some(price)) = (record.year_built, record.valid_price()) else {
            continue;
        };
        let entry = by_year.entry(year).or_insert((0.0, 0));
        entry.0 += price;
        entry.1 += 1;
    }

    if by_year.is_empty() {
        return Err(CoreError::data_unavailable(
            "no property data with year built and price available for trend calculation",
        ));
    }

    Ok(by_year
        .into_iter()
        .map(|(year, (sum, count))| TrendPoint::new(year, sum / count as f64, count))
        .collect())
}

/// Statistics per bedroom count.
///
/// A segment whose records all fail the price filter yields
/// [`MarketStats::empty`] instead of an error.
///
/// # Errors
///
/// [`CoreError::DataUnavailable`] when no record carries a bedroom count.
pub fn compute_segments(records: &[PropertyRecord]) -> Result<BedroomSegments, CoreError> {
    if records.is_empty() {
        return Err(CoreError::data_unavailable(
            "no property data available for segmentation calculation",
        ));
    }

    let mut groups: BTreeMap<u32, Vec<&PropertyRecord>> = BTreeMap::new();
    for record in records {
        if let Some(bedrooms) = record.bedrooms {
            groups.entry(bedrooms).or_default().push(record);
        }
    }

    if groups.is_empty() {
        return Err(CoreError::data_unavailable(
            "no property data with bedrooms available for segment calculation",
        ));
    }

    Ok(groups
        .into_iter()
        .map(|(bedrooms, members)| {
            let valid: Vec<&PropertyRecord> = members
                .into_iter()
                .filter(|record| record.is_valid())
                .collect();
            (bedrooms, summarize(&valid).unwrap_or_else(MarketStats::empty))
        })
        .collect())
}

/// Median of an ascending slice; `None` when empty.
pub fn median(sorted: &[f64]) -> Option<f64> {
    let n = sorted.len();
    if n == 0 {
        return None;
    }
    if n % 2 == 1 {
        Some(sorted[n / 2])
    } else {
        Some((sorted[n / 2 - 1] + sorted[n / 2]) / 2.0)
    }
}

/// Two-point change between the mean price of the oldest and newest years.
///
/// Zero when either year is absent, when they coincide, when a year has no
/// priced record in `valid`, or when the oldest mean is zero.
pub fn price_change_percent(
    valid: &[&PropertyRecord],
    oldest_year: Option<i32>,
    newest_year: Option<i32>,
) -> f64 {
    let (Some(oldest), Some(newest)) = (oldest_year, newest_year) else {
        return 0.0;
    };
    if oldest == newest {
        return 0.0;
    }

    let (Some(old_avg), Some(new_avg)) = (
        mean_price_for_year(valid, oldest),
        mean_price_for_year(valid, newest),
    ) else {
        return 0.0;
    };

    if old_avg == 0.0 {
        return 0.0;
    }
    ((new_avg - old_avg) / old_avg) * 100.0
}

fn valid_records(records: &[PropertyRecord]) -> Vec<&PropertyRecord> {
    records.iter().filter(|record| record.is_valid()).collect()
}

/// Statistics over already-validated records; `None` when there are none.
fn summarize(valid: &[&PropertyRecord]) -> Option<MarketStats> {
    let mut prices: Vec<f64> = valid.iter().filter_map(|record| record.valid_price()).collect();
    let average_price = mean(&prices)?;

    prices.sort_by(f64::total_cmp);
    let median_price = median(&prices)?;

    let square_footage: Vec<f64> = valid
        .iter()
        .filter_map(|record| record.square_footage.map(f64::from))
        .collect();

    let years = valid.iter().filter_map(|record| record.year_built);
    let oldest_year = years.clone().min();
    let newest_year = years.max();

    Some(MarketStats {
        average_price,
        median_price,
        total_volume: prices.len() as u64,
        price_change_percent: price_change_percent(valid, oldest_year, newest_year),
        average_square_footage: mean(&square_footage),
        oldest_year,
        newest_year,
    })
}

fn mean_price_for_year(valid: &[&PropertyRecord], year: i32) -> Option<f64> {
    let prices: Vec<f64> = valid
        .iter()
        .filter(|record| record.year_built == Some(year))
        .filter_map(|record| record.valid_price())
        .collect();
    mean(&prices)
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}
