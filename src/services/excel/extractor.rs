use super::activity::{normalize, resolve_activity_column, resolve_name_column, Resolution};
use super::error::ExtractionError;
use super::lanes::subset_lanes;
use super::loader::load_table;
use super::time::extract_time;
use super::types::{ExtractionReport, Table, TableView};

/// Runs the whole extraction over one loaded table.
///
/// Fatal problems (no lane/activity/name/time column, missing or invalid
/// experiment time) abort the run. Rows whose activity cannot be read are
/// collected in the report instead.
pub fn extract(table: &Table) -> Result<ExtractionReport, ExtractionError> {
    let start = std::time::Instant::now();

    let lanes = subset_lanes(table)?;
    let experiment_time = extract_time(table)?;

    if lanes.is_empty() {
        tracing::warn!("No lane rows found; nothing to extract");
        return Ok(ExtractionReport::empty(experiment_time));
    }

    let activity = resolve_activity_column(&lanes)?;
    // The header-aligned lane row is the header row itself, not a sample.
    let samples = match activity.resolution {
        Resolution::HeaderAligned => lanes.without_first_row(),
        Resolution::Heuristic => lanes,
    };
    if samples.is_empty() {
        tracing::warn!("Only a header row among the lane rows; nothing to extract");
        return Ok(ExtractionReport::empty(experiment_time));
    }

    let name = resolve_name_column(&samples)?;
    tracing::info!(
        "Reading names from column {} and activity from column {} over {} lane rows",
        name,
        activity.column,
        samples.row_count()
    );

    let mut row_errors = Vec::new();
    let mut pass = normalize(&samples, &name, &activity.column, experiment_time, &mut row_errors);
    let records: Vec<_> = pass.by_ref().collect();
    let rows_considered = pass.named_rows();

    let report = ExtractionReport {
        experiment_time,
        rows_considered,
        records,
        row_errors,
    };
    tracing::info!("Extraction finished in {:?}: {}", start.elapsed(), report.summary());
    Ok(report)
}

/// Loads `data` as a `format` spreadsheet and extracts it.
pub fn extract_bytes(data: &[u8], format: &str) -> Result<ExtractionReport, ExtractionError> {
    let table = load_table(data, format)?;
    extract(&table)
}
