use super::classifier::most_abundant_column;
use super::error::{ExtractionError, RowProcessingError, Stage};
use super::types::{ColumnId, ExperimentTime, ExtractionResult, RowSubset, TableView};

pub const ACTIVITY_HEADER: &str = "pmol/mg";
pub const NAME_PATTERN: &str = "pcdna|blank|wt";

/// How the activity column was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Subset row 0 holds the exact `pmol/mg` header in this column.
    HeaderAligned,
    /// Substring classification; may confuse `pmol/mg` with `pmol/mg/min`.
    Heuristic,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityColumn {
    pub column: ColumnId,
    pub resolution: Resolution,
}

/// Locates the raw activity column, preferring the exact `pmol/mg` header
/// on the subset's first row over substring classification.
pub fn resolve_activity_column(subset: &RowSubset<'_>) -> Result<ActivityColumn, ExtractionError> {
    if subset.row_count() > 0 {
        let header_aligned = (0..subset.column_count())
            .find(|&column| subset.cell(0, column).as_match_str() == Some(ACTIVITY_HEADER));
        if let Some(index) = header_aligned {
            return Ok(ActivityColumn {
                column: ColumnId::of(subset, index),
                resolution: Resolution::HeaderAligned,
            });
        }
    }

    let column = most_abundant_column(subset, ACTIVITY_HEADER)
        .map_err(ExtractionError::classify(Stage::Activity))?;
    tracing::warn!(
        "No exact `{}` header on the first lane row; using column {} by substring match",
        ACTIVITY_HEADER,
        column
    );
    Ok(ActivityColumn {
        column,
        resolution: Resolution::Heuristic,
    })
}

pub fn resolve_name_column(subset: &RowSubset<'_>) -> Result<ColumnId, ExtractionError> {
    most_abundant_column(subset, NAME_PATTERN).map_err(ExtractionError::classify(Stage::Name))
}

/// Lazy single pass over the subset producing normalized activities.
///
/// Rows with a blank name are skipped. Rows whose activity cannot be read
/// are pushed to the error sink and skipped.
pub struct Normalize<'s, 't, 'e> {
    subset: &'s RowSubset<'t>,
    name_column: usize,
    activity_column: usize,
    time: ExperimentTime,
    next_row: usize,
    named_rows: usize,
    errors: &'e mut Vec<RowProcessingError>,
}

pub fn normalize<'s, 't, 'e>(
    subset: &'s RowSubset<'t>,
    name_column: &ColumnId,
    activity_column: &ColumnId,
    time: ExperimentTime,
    errors: &'e mut Vec<RowProcessingError>,
) -> Normalize<'s, 't, 'e> {
    Normalize {
        subset,
        name_column: name_column.index,
        activity_column: activity_column.index,
        time,
        next_row: 0,
        named_rows: 0,
        errors,
    }
}

impl Normalize<'_, '_, '_> {
    /// Rows seen so far that carried a sample name.
    pub fn named_rows(&self) -> usize {
        self.named_rows
    }

    fn process_row(&mut self, row: usize) -> Option<ExtractionResult> {
        let name = self.subset.cell(row, self.name_column).display().trim().to_string();
        if name.is_empty() {
            return None;
        }
        self.named_rows += 1;

        let activity = self.subset.cell(row, self.activity_column);
        let outcome = match activity.to_number() {
            None if activity.is_blank() => Err("missing activity value".to_string()),
            None => Err(format!("activity `{}` is not a number", activity.display())),
            Some(raw) => {
                let normalized = self.time.normalize(raw);
                if normalized.is_finite() {
                    Ok(normalized)
                } else {
                    Err(format!("activity `{}` does not normalize to a finite value", activity.display()))
                }
            }
        };

        match outcome {
            Ok(normalized_activity) => Some(ExtractionResult { name, normalized_activity }),
            Err(reason) => {
                let error = RowProcessingError {
                    row: self.subset.source_row(row),
                    name,
                    reason,
                };
                tracing::warn!("Skipping {}", error);
                self.errors.push(error);
                None
            }
        }
    }
}

impl Iterator for Normalize<'_, '_, '_> {
    type Item = ExtractionResult;

    fn next(&mut self) -> Option<Self::Item> {
        while self.next_row < self.subset.row_count() {
            let row = self.next_row;
            self.next_row += 1;
            if let Some(result) = self.process_row(row) {
                return Some(result);
            }
        }
        None
    }
}
