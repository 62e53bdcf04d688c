use serde::Serialize;

use super::extractor::extract_bytes;
use super::types::ExtractionReport;
use super::utils::{allowed_file, clean_source_name, file_extension};
use crate::error::AppError;
use crate::services::record_store::RecordStore;

#[derive(Debug, Serialize)]
pub struct ProcessedUpload {
    pub source: String,
    pub stored: usize,
    pub summary: String,
    #[serde(flatten)]
    pub report: ExtractionReport,
}

/// Extracts an uploaded spreadsheet and persists its records.
pub struct ExcelProcessor<'a> {
    store: &'a RecordStore,
}

impl<'a> ExcelProcessor<'a> {
    pub fn new(store: &'a RecordStore) -> Self {
        Self { store }
    }

    pub fn process_file(&self, file_name: &str, file_data: &[u8]) -> Result<ProcessedUpload, AppError> {
        let start = std::time::Instant::now();
        let source = clean_source_name(file_name);
        tracing::info!("Processing upload {} ({}KB)", source, file_data.len() / 1024);

        if !allowed_file(file_name) {
            return Err(AppError::InvalidInput(format!("Unsupported file type: {}", file_name)));
        }
        let format = file_extension(file_name).unwrap_or_default();

        let report = extract_bytes(file_data, &format).map_err(|e| {
            tracing::error!("Extraction failed for {}: {}", source, e);
            AppError::from(e)
        })?;

        let stored = self.store.insert_records(&source, &report.records)?;
        tracing::info!("Processed {} in {:?}: {}", source, start.elapsed(), report.summary());

        Ok(ProcessedUpload {
            summary: report.summary(),
            source,
            stored,
            report,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::excel::error::ExtractionError;

    const RUN: &str = "\
Assay,,,,
time (min),Sample,Lane,pmol/mg,pmol/mg/min
4,pcdna,Lane 1,8,2
,wt,Lane 2,12,3
";

    #[test]
    fn extracted_records_are_stored_under_the_cleaned_name() {
        let store = RecordStore::in_memory().unwrap();
        let upload = ExcelProcessor::new(&store)
            .process_file("my run.csv", RUN.as_bytes())
            .unwrap();

        assert_eq!(upload.source, "my_run.csv");
        assert_eq!(upload.stored, 2);
        assert_eq!(upload.summary, "2 of 2 rows extracted, 0 failed");

        let stored = store.list_records().unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].name, "pcdna");
        assert_eq!(stored[0].normalized_activity, 2.0);
        assert_eq!(stored[1].normalized_activity, 3.0);
    }

    #[test]
    fn disallowed_extension_is_invalid_input() {
        let store = RecordStore::in_memory().unwrap();
        let err = ExcelProcessor::new(&store).process_file("run.txt", RUN.as_bytes()).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[test]
    fn failed_extraction_stores_nothing() {
        let store = RecordStore::in_memory().unwrap();
        let without_time = RUN.replace("time (min)", "duration");
        let err = ExcelProcessor::new(&store)
            .process_file("run.csv", without_time.as_bytes())
            .unwrap_err();

        assert!(matches!(err, AppError::Extraction(ExtractionError::TimeNotFound { .. })));
        assert!(store.list_records().unwrap().is_empty());
    }
}
