//! CLI argument definitions for homevalue.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `stats` | Overall market statistics of a snapshot |
//! | `trend` | Average price per construction year |
//! | `segments` | Statistics per bedroom count |
//! | `property` | Look up one record by id |
//! | `properties` | Page through records, optionally filtered and sorted |
//! | `what-if` | Value a candidate property with the external model |
//! | `health` | Probe the valuation model |
//! | `model-info` | Describe the deployed valuation model |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--model-url` | `HOMEVALUE_MODEL_URL` or `http://localhost:8000` | Valuation model base URL |
//! | `--timeout-ms` | `HOMEVALUE_RESPONSE_TIMEOUT_MS` or `30000` | Response bound per model call |
//! | `--pretty` | `false` | Pretty-print JSON output |
//!
//! # Examples
//!
//! ```bash
//! homevalue stats --snapshot listings.json --pretty
//! homevalue trend --snapshot listings.json --min-price 100000
//! homevalue properties --snapshot listings.json --sort-by year-built --direction desc --page 1
//! homevalue what-if --square-footage 1850 --bedrooms 3 --bathrooms 2.5 \
//!     --year-built 1995 --lot-size 6000 --distance 4.2 --school-rating 8
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use homevalue_core::{FeatureSet, PageRequest, PropertyFilter, SortDirection, SortField};

/// Market analytics and property valuation
#[derive(Debug, Parser)]
#[command(
    name = "homevalue",
    author,
    version,
    about = "Market analytics and property valuation",
    long_about = "homevalue computes market statistics over a property snapshot and values \
candidate properties through an external regression model.\n\
\n\
Every command prints one JSON response envelope on stdout. Logs go to stderr \
and are controlled by HOMEVALUE_LOG (default: info)."
)]
pub struct Cli {
    /// Valuation model base URL.
    #[arg(long, global = true, env = "HOMEVALUE_MODEL_URL")]
    pub model_url: Option<String>,

    /// Response timeout per model call in milliseconds.
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Overall statistics of the snapshot.
    Stats(SnapshotArgs),
    /// Average price per construction year, ascending.
    Trend(SnapshotArgs),
    /// Statistics grouped by bedroom count.
    Segments(SnapshotArgs),
    /// Single record lookup.
    Property(PropertyArgs),
    /// Paginated record listing.
    Properties(ListArgs),
    /// Value a candidate property.
    WhatIf(WhatIfArgs),
    /// Probe the valuation model.
    Health,
    /// Describe the deployed valuation model.
    ModelInfo,
}

#[derive(Debug, Clone, Args)]
pub struct SnapshotArgs {
    /// JSON file holding an array of property records.
    #[arg(long)]
    pub snapshot: PathBuf,

    /// Only listings with exactly this many bedrooms.
    #[arg(long)]
    pub bedrooms: Option<u32>,

    /// Inclusive lower price bound.
    #[arg(long)]
    pub min_price: Option<f64>,

    /// Inclusive upper price bound.
    #[arg(long)]
    pub max_price: Option<f64>,

    /// Inclusive lower construction year bound.
    #[arg(long)]
    pub year_from: Option<i32>,

    /// Inclusive upper construction year bound.
    #[arg(long)]
    pub year_to: Option<i32>,
}

impl SnapshotArgs {
    pub fn filter(&self) -> PropertyFilter {
        PropertyFilter {
            bedrooms: self.bedrooms,
            min_price: self.min_price,
            max_price: self.max_price,
            year_from: self.year_from,
            year_to: self.year_to,
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct PropertyArgs {
    #[arg(long)]
    pub snapshot: PathBuf,

    #[arg(long)]
    pub id: u64,
}

#[derive(Debug, Clone, Args)]
pub struct ListArgs {
    #[command(flatten)]
    pub selection: SnapshotArgs,

    /// Zero-based page index.
    #[arg(long, default_value_t = 0)]
    pub page: usize,

    /// Records per page (1-1000).
    #[arg(long, default_value_t = 10)]
    pub size: usize,

    /// Sort attribute: id, price, square-footage or year-built.
    #[arg(long, default_value = "price")]
    pub sort_by: SortField,

    /// `desc` for descending, anything else ascending.
    #[arg(long, default_value = "asc")]
    pub direction: SortDirection,
}

impl ListArgs {
    pub fn request(&self) -> PageRequest {
        PageRequest {
            page: self.page,
            size: self.size,
            sort_by: self.sort_by,
            direction: self.direction,
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct WhatIfArgs {
    /// Living area in square feet (500-10000).
    #[arg(long)]
    pub square_footage: f64,

    /// Bedroom count (1-10).
    #[arg(long)]
    pub bedrooms: f64,

    /// Bathroom count (1-10).
    #[arg(long)]
    pub bathrooms: f64,

    /// Construction year (1900-2030).
    #[arg(long)]
    pub year_built: f64,

    /// Lot size in square feet (1000-50000).
    #[arg(long)]
    pub lot_size: f64,

    /// Distance to the city center in miles (0-10).
    #[arg(long = "distance")]
    pub distance_to_city_center: f64,

    /// School rating (1-10).
    #[arg(long)]
    pub school_rating: f64,

    /// Fail on the first transport error instead of backing off.
    #[arg(long, default_value_t = false)]
    pub no_retry: bool,
}

impl WhatIfArgs {
    pub fn features(&self) -> FeatureSet {
        FeatureSet {
            square_footage: self.square_footage,
            bedrooms: self.bedrooms,
            bathrooms: self.bathrooms,
            year_built: self.year_built,
            lot_size: self.lot_size,
            distance_to_city_center: self.distance_to_city_center,
            school_rating: self.school_rating,
        }
    }
}
