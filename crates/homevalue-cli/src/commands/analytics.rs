use std::fs;
use std::path::Path;

use homevalue_core::{ApiResponse, CoreError, InMemoryPropertyStore, MarketAnalysis, PropertyRecord};
use serde_json::Value;
use tracing::debug;

use crate::cli::{ListArgs, PropertyArgs, SnapshotArgs};
use crate::error::CliError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Statistic {
    Overall,
    Trend,
    Segments,
}

pub async fn run(statistic: Statistic, args: &SnapshotArgs) -> Result<ApiResponse<Value>, CliError> {
    let store = InMemoryPropertyStore::new(load_snapshot(&args.snapshot)?);
    let records = store.filter(&args.filter());
    debug!(
        loaded = store.len(),
        selected = records.len(),
        "applied snapshot filter"
    );

    let analysis = MarketAnalysis::in_memory(records);
    let (message, data) = match statistic {
        Statistic::Overall => (
            "Market statistics retrieved",
            serde_json::to_value(analysis.overall().await?)?,
        ),
        Statistic::Trend => (
            "Market trend retrieved",
            serde_json::to_value(analysis.trend().await?)?,
        ),
        Statistic::Segments => (
            "Bedroom segments retrieved",
            serde_json::to_value(analysis.bedroom_segments().await?)?,
        ),
    };

    Ok(ApiResponse::success_with_message(message, data))
}

pub fn property(args: &PropertyArgs) -> Result<ApiResponse<Value>, CliError> {
    let store = InMemoryPropertyStore::new(load_snapshot(&args.snapshot)?);
    let record = store
        .find_by_id(args.id)
        .ok_or_else(|| CoreError::data_unavailable(format!("property {} not found", args.id)))?;

    Ok(ApiResponse::success_with_message(
        "Property retrieved",
        serde_json::to_value(record)?,
    ))
}

pub fn list(args: &ListArgs) -> Result<ApiResponse<Value>, CliError> {
    let store = InMemoryPropertyStore::new(load_snapshot(&args.selection.snapshot)?);
    let filter = args.selection.filter();
    let page = store
        .page(&filter, &args.request())
        .map_err(CoreError::from)?;
    debug!(
        page = page.page,
        returned = page.content.len(),
        total = page.total_elements,
        "listed properties"
    );

    let message = if filter.is_unrestricted() {
        "Properties retrieved"
    } else {
        "Filtered properties retrieved"
    };
    Ok(ApiResponse::success_with_message(message, serde_json::to_value(page)?))
}

/// Reads a JSON array of property records.
pub fn load_snapshot(path: &Path) -> Result<Vec<PropertyRecord>, CliError> {
    let raw = fs::read_to_string(path)?;
    let records: Vec<PropertyRecord> = serde_json::from_str(&raw)?;
    debug!(path = %path.display(), records = records.len(), "loaded snapshot");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;

    use homevalue_core::{SortDirection, SortField};
    use tempfile::NamedTempFile;

    fn snapshot(json: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(json.as_bytes()).expect("write snapshot");
        file
    }

    fn args(path: PathBuf) -> SnapshotArgs {
        SnapshotArgs {
            snapshot: path,
            bedrooms: None,
            min_price: None,
            max_price: None,
            year_from: None,
            year_to: None,
        }
    }

    const LISTINGS: &str = r#"[
        {"id": 1, "bedrooms": 2, "yearBuilt": 2000, "price": 100000},
        {"id": 2, "bedrooms": 3, "yearBuilt": 2020, "price": 200000},
        {"id": 3, "bedrooms": 3, "yearBuilt": 2020, "price": null}
    ]"#;

    #[tokio::test]
    async fn stats_wraps_overall_statistics_in_envelope() {
        let file = snapshot(LISTINGS);

        let response = run(Statistic::Overall, &args(file.path().to_path_buf()))
            .await
            .expect("stats");

        assert!(response.is_success());
        let data = response.data.expect("data");
        assert_eq!(data["totalVolume"], 2);
        assert_eq!(data["priceChangePercent"], 100.0);
    }

    #[tokio::test]
    async fn filters_narrow_the_snapshot_before_analysis() {
        let file = snapshot(LISTINGS);
        let mut args = args(file.path().to_path_buf());
        args.bedrooms = Some(3);

        let response = run(Statistic::Segments, &args).await.expect("segments");

        let data = response.data.expect("data");
        assert!(data.get("2").is_none());
        assert_eq!(data["3"]["totalVolume"], 1);
    }

    #[tokio::test]
    async fn empty_snapshot_is_data_unavailable() {
        let file = snapshot("[]");

        let error = run(Statistic::Trend, &args(file.path().to_path_buf()))
            .await
            .expect_err("empty");

        assert_eq!(error.exit_code(), 3);
    }

    #[test]
    fn malformed_snapshot_is_a_serialization_error() {
        let file = snapshot("{not json");
        let error = load_snapshot(file.path()).expect_err("malformed");
        assert_eq!(error.exit_code(), 4);
    }

    #[test]
    fn property_lookup_reports_missing_ids() {
        let file = snapshot(LISTINGS);

        let found = property(&PropertyArgs {
            snapshot: file.path().to_path_buf(),
            id: 2,
        })
        .expect("found");
        assert_eq!(found.data.expect("data")["price"], 200000.0);

        let missing = property(&PropertyArgs {
            snapshot: file.path().to_path_buf(),
            id: 99,
        })
        .expect_err("missing");
        assert_eq!(missing.exit_code(), 3);
    }

    #[test]
    fn snapshot_with_one_malformed_record_still_loads() {
        let file = snapshot(
            r#"[
                {"id": 1, "yearBuilt": 2000, "price": 100000},
                {"id": 2, "yearBuilt": 2020, "price": "n/a", "squareFootage": 1400.5},
                {"id": 3, "yearBuilt": 2020, "price": 200000, "bedrooms": -1}
            ]"#,
        );

        let records = load_snapshot(file.path()).expect("lenient snapshot");

        assert_eq!(records.len(), 3);
        assert_eq!(records[1].price, None);
        assert_eq!(records[2].bedrooms, None);
        assert_eq!(records[2].price, Some(200_000.0));
    }

    fn list_args(path: PathBuf) -> ListArgs {
        ListArgs {
            selection: args(path),
            page: 0,
            size: 2,
            sort_by: SortField::Price,
            direction: SortDirection::Desc,
        }
    }

    #[test]
    fn list_pages_sorted_records_with_totals() {
        let file = snapshot(LISTINGS);

        let response = list(&list_args(file.path().to_path_buf())).expect("listing");

        assert_eq!(response.message, "Properties retrieved");
        let data = response.data.expect("data");
        assert_eq!(data["totalElements"], 3);
        assert_eq!(data["totalPages"], 2);
        assert_eq!(data["content"][0]["id"], 2);
        assert_eq!(data["content"][1]["id"], 1);
    }

    #[test]
    fn list_reports_filtered_listing_and_rejects_zero_size() {
        let file = snapshot(LISTINGS);
        let mut filtered = list_args(file.path().to_path_buf());
        filtered.selection.bedrooms = Some(3);

        let response = list(&filtered).expect("filtered listing");
        assert_eq!(response.message, "Filtered properties retrieved");
        assert_eq!(response.data.expect("data")["totalElements"], 2);

        filtered.size = 0;
        let error = list(&filtered).expect_err("zero size");
        assert_eq!(error.exit_code(), 2);
    }
}
