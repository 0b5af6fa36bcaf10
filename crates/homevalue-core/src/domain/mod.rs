//! # Domain Models
//!
//! Canonical types shared by the statistics engine and the valuation gateway.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`PropertyRecord`] | One row of the property dataset, every field optional |
//! | [`Page`] | One ordered page of a record listing |
//! | [`MarketStats`] | Aggregate price statistics over a set of records |
//! | [`TrendPoint`] | Average price for one construction year |
//! | [`FeatureSet`] | Candidate property submitted for a what-if valuation |
//! | [`ValuationResult`] | Price predicted by the external model |
//! | [`ModelInfo`] | Descriptive metadata published by the model service |
//!
//! Missing source data is always `None`, never a zero sentinel. Records are
//! filtered by [`PropertyRecord::is_valid`] before any aggregation.

mod page;
mod property;
mod stats;
mod valuation;

pub use page::{Page, PageRequest, SortDirection, SortField, MAX_PAGE_SIZE};
pub use property::{PropertyFilter, PropertyRecord};
pub use stats::{BedroomSegments, MarketStats, TrendPoint};
pub use valuation::{FeatureSet, ModelInfo, ModelPerformance, ValuationResult};
