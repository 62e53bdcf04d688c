pub mod activity;
pub mod classifier;
pub mod error;
pub mod extractor;
pub mod lanes;
pub mod loader;
pub mod processor;
pub mod time;
pub mod types;
pub mod utils;

pub use classifier::most_abundant_column;
pub use error::{ClassifyError, ExtractionError, LoadError, RowProcessingError, Stage};
pub use extractor::{extract, extract_bytes};
pub use loader::{load_table, load_table_from_path};
pub use processor::{ExcelProcessor, ProcessedUpload};
pub use types::{Cell, ColumnId, ExperimentTime, ExtractionReport, ExtractionResult, RowSubset, Table, TableView};
