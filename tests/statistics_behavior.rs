//! Behavior-driven tests for the statistics engine
//!
//! These tests verify HOW market statistics are derived from a property
//! snapshot, including the degenerate inputs that must surface as errors.

use homevalue_core::statistics::{compute_overall, compute_segments, compute_trend, median};
use homevalue_core::{ErrorKind, PropertyRecord};

fn listing(year: Option<i32>, price: Option<f64>, bedrooms: Option<u32>) -> PropertyRecord {
    PropertyRecord {
        bedrooms,
        ..PropertyRecord::priced(year, price)
    }
}

fn neighbourhood() -> Vec<PropertyRecord> {
    vec![
        listing(Some(1985), Some(180_000.0), Some(2)),
        listing(Some(1985), Some(220_000.0), Some(3)),
        listing(Some(2001), Some(310_000.0), Some(3)),
        listing(Some(2001), Some(f64::NAN), Some(4)),
        listing(None, Some(275_000.0), Some(4)),
        listing(Some(2015), Some(0.0), Some(2)),
        listing(Some(2015), Some(450_000.0), None),
        listing(Some(2020), None, Some(5)),
    ]
}

// =============================================================================
// Overall statistics
// =============================================================================

#[test]
fn when_prices_double_between_oldest_and_newest_year_change_is_one_hundred_percent() {
    // Given: One listing from 2000 and one from 2020 at twice the price
    let records = vec![
        PropertyRecord::priced(Some(2000), Some(100_000.0)),
        PropertyRecord::priced(Some(2020), Some(200_000.0)),
    ];

    // When: Overall statistics are computed
    let stats = compute_overall(&records).expect("stats");

    // Then: The two-point change is exactly 100%
    assert_eq!(stats.price_change_percent, 100.0);
    assert_eq!(stats.average_price, 150_000.0);
    assert_eq!(stats.median_price, 150_000.0);
    assert_eq!(stats.total_volume, 2);
    assert_eq!(stats.oldest_year, Some(2000));
    assert_eq!(stats.newest_year, Some(2020));
}

#[test]
fn when_invalid_prices_are_present_system_excludes_them_from_every_figure() {
    // Given: A snapshot mixing valid, zero, NaN and missing prices
    let records = neighbourhood();

    // When: Overall statistics are computed
    let stats = compute_overall(&records).expect("stats");

    // Then: Only the five positive prices contribute
    assert_eq!(stats.total_volume, 5);
    assert_eq!(stats.median_price, 275_000.0);
    assert!((stats.average_price - 287_000.0).abs() < 1e-9);
    assert_eq!(stats.oldest_year, Some(1985));
    assert_eq!(stats.newest_year, Some(2015));

    // 1985 mean = 200_000, 2015 mean = 450_000
    assert!((stats.price_change_percent - 125.0).abs() < 1e-9);
}

#[test]
fn when_all_listings_share_one_year_price_change_is_zero() {
    // Given: Listings built in the same year
    let records = vec![
        PropertyRecord::priced(Some(2010), Some(100_000.0)),
        PropertyRecord::priced(Some(2010), Some(300_000.0)),
    ];

    // When / Then: No two-point trend exists
    let stats = compute_overall(&records).expect("stats");
    assert_eq!(stats.price_change_percent, 0.0);
}

#[test]
fn when_no_listing_has_a_year_price_change_is_zero_and_years_are_absent() {
    // Given: Priced listings without construction year
    let records = vec![
        PropertyRecord::priced(None, Some(100_000.0)),
        PropertyRecord::priced(None, Some(120_000.0)),
    ];

    // When
    let stats = compute_overall(&records).expect("stats");

    // Then: Absence is reported as absence, not as year zero
    assert_eq!(stats.price_change_percent, 0.0);
    assert_eq!(stats.oldest_year, None);
    assert_eq!(stats.newest_year, None);
    assert_eq!(stats.average_square_footage, None);
}

#[test]
fn when_square_footage_is_partially_missing_average_uses_present_values_only() {
    // Given: Two priced listings, only one with a square footage
    let records = vec![
        PropertyRecord {
            square_footage: Some(1_600),
            ..PropertyRecord::priced(Some(1999), Some(200_000.0))
        },
        PropertyRecord::priced(Some(1999), Some(220_000.0)),
    ];

    // When
    let stats = compute_overall(&records).expect("stats");

    // Then: The missing value is excluded, the record still counts
    assert_eq!(stats.average_square_footage, Some(1_600.0));
    assert_eq!(stats.total_volume, 2);
}

#[test]
fn when_no_price_survives_filtering_system_reports_distinct_error() {
    // Given: A non-empty snapshot with only unusable prices
    let records = vec![
        PropertyRecord::priced(Some(2000), Some(0.0)),
        PropertyRecord::priced(Some(2001), Some(-5.0)),
        PropertyRecord::priced(Some(2002), None),
    ];

    // When
    let empty = compute_overall(&[]).expect_err("empty snapshot");
    let filtered = compute_overall(&records).expect_err("nothing valid");

    // Then: Both are DataUnavailable but distinguishable
    assert_eq!(empty.kind(), ErrorKind::DataUnavailable);
    assert_eq!(filtered.kind(), ErrorKind::DataUnavailable);
    assert_ne!(empty.to_string(), filtered.to_string());
}

// =============================================================================
// Median
// =============================================================================

#[test]
fn median_picks_middle_for_odd_and_mean_of_middles_for_even() {
    assert_eq!(median(&[3.0]), Some(3.0));
    assert_eq!(median(&[1.0, 2.0, 10.0]), Some(2.0));
    assert_eq!(median(&[1.0, 2.0, 4.0, 10.0]), Some(3.0));
    assert_eq!(median(&[]), None);
}

// =============================================================================
// Trend
// =============================================================================

#[test]
fn when_trend_is_computed_every_trend_valid_record_is_counted_once() {
    // Given: The mixed neighbourhood snapshot
    let records = neighbourhood();
    let eligible = records
        .iter()
        .filter(|record| record.is_valid_for_trend())
        .count() as u64;

    // When
    let trend = compute_trend(&records).expect("trend");

    // Then: Counts add up, years are unique and strictly ascending
    assert_eq!(trend.iter().map(|point| point.count).sum::<u64>(), eligible);
    assert!(trend.windows(2).all(|pair| pair[0].year < pair[1].year));

    let years: Vec<i32> = trend.iter().map(|point| point.year).collect();
    assert_eq!(years, vec![1985, 2001, 2015]);
    assert_eq!(trend[0].average_price, 200_000.0);
    assert_eq!(trend[0].label, "1985");
}

#[test]
fn when_no_record_has_both_year_and_price_trend_fails() {
    // Given: Prices without years and years without prices
    let records = vec![
        PropertyRecord::priced(None, Some(100_000.0)),
        PropertyRecord::priced(Some(2005), None),
    ];

    // When / Then
    let error = compute_trend(&records).expect_err("no trend data");
    assert_eq!(error.kind(), ErrorKind::DataUnavailable);
}

// =============================================================================
// Segmentation
// =============================================================================

#[test]
fn when_segmenting_by_bedrooms_volumes_add_up_to_grouped_valid_records() {
    // Given: The mixed neighbourhood snapshot
    let records = neighbourhood();
    let grouped_valid = records
        .iter()
        .filter(|record| record.bedrooms.is_some() && record.is_valid())
        .count() as u64;

    // When
    let segments = compute_segments(&records).expect("segments");

    // Then: Every bedroom count appears and volumes are complete
    assert_eq!(segments.keys().copied().collect::<Vec<_>>(), vec![2, 3, 4, 5]);
    assert_eq!(
        segments.values().map(|stats| stats.total_volume).sum::<u64>(),
        grouped_valid
    );
    assert_eq!(segments[&3].average_price, 265_000.0);
}

#[test]
fn when_a_segment_has_no_valid_price_it_is_reported_empty() {
    // Given: The five-bedroom group only holds an unpriced listing
    let segments = compute_segments(&neighbourhood()).expect("segments");

    // Then: The group is present with zero volume
    let five = &segments[&5];
    assert!(five.is_empty());
    assert_eq!(five.average_price, 0.0);
}

// =============================================================================
// Empty input
// =============================================================================

#[test]
fn when_dataset_is_empty_every_computation_reports_data_unavailable() {
    let records: Vec<PropertyRecord> = Vec::new();

    assert_eq!(
        compute_overall(&records).expect_err("overall").kind(),
        ErrorKind::DataUnavailable
    );
    assert_eq!(
        compute_trend(&records).expect_err("trend").kind(),
        ErrorKind::DataUnavailable
    );
    assert_eq!(
        compute_segments(&records).expect_err("segments").kind(),
        ErrorKind::DataUnavailable
    );
}
