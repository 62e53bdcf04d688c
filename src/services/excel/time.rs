use super::classifier::most_abundant_column;
use super::error::{ClassifyError, ExtractionError, Stage};
use super::types::{Cell, ExperimentTime, Table, TableView};

pub const TIME_PATTERN: &str = r"time \(min\)";
pub const TIME_MARKER: &str = "time (min)";

#[derive(Debug, Clone, PartialEq)]
enum ScanState<'a> {
    Searching,
    Armed,
    Captured(&'a Cell),
}

impl<'a> ScanState<'a> {
    fn step(self, cell: &'a Cell) -> Self {
        match self {
            ScanState::Searching if cell.as_match_str() == Some(TIME_MARKER) => ScanState::Armed,
            ScanState::Searching => ScanState::Searching,
            ScanState::Armed => ScanState::Captured(cell),
            captured @ ScanState::Captured(_) => captured,
        }
    }
}

fn read_duration(cell: &Cell) -> Result<ExperimentTime, &'static str> {
    let minutes = match cell {
        Cell::Empty => return Err("cell is blank"),
        Cell::Other(_) => return Err("cell is not plain text or a number (date or duration formatted?)"),
        Cell::Text(_) if cell.is_blank() => return Err("cell is blank"),
        Cell::Text(_) | Cell::Number(_) => cell.to_number().ok_or("text is not a number")?,
    };
    ExperimentTime::new(minutes).ok_or("duration must be a positive number of minutes")
}

/// The first sheet row only supplies labels, so a marker there is invisible
/// to the scan.
fn unsearched_label_hint(table: &Table) -> String {
    let in_labels = (0..table.column_count())
        .any(|column| table.column_label(column).eq_ignore_ascii_case(TIME_MARKER));
    if in_labels {
        "any data row (it sits in the first sheet row, which is read as column labels and not searched)"
            .to_string()
    } else {
        "any data row (the first sheet row is read as column labels and not searched)".to_string()
    }
}

/// Reads the experiment duration: the cell right below the first
/// `time (min)` marker in the time column.
pub fn extract_time(table: &Table) -> Result<ExperimentTime, ExtractionError> {
    let column = match most_abundant_column(table, TIME_PATTERN) {
        Ok(column) => column,
        Err(ClassifyError::NoMatch { .. }) => {
            return Err(ExtractionError::TimeNotFound {
                searched: unsearched_label_hint(table),
            });
        }
        Err(source) => return Err(ExtractionError::Classify { stage: Stage::Time, source }),
    };

    let mut state = ScanState::Searching;
    for cell in table.column_cells(column.index) {
        state = state.step(cell);
        if matches!(state, ScanState::Captured(_)) {
            break;
        }
    }

    let cell = match state {
        ScanState::Captured(cell) => cell,
        ScanState::Armed => {
            tracing::warn!("Time marker is the last cell of column {}", column);
            return Err(ExtractionError::TimeNotFound {
                searched: format!("column {}", column),
            });
        }
        ScanState::Searching => {
            return Err(ExtractionError::TimeNotFound {
                searched: format!("column {}", column),
            });
        }
    };

    let time = read_duration(cell).map_err(|reason| ExtractionError::InvalidTime {
        value: cell.display().into_owned(),
        column: column.to_string(),
        reason: reason.to_string(),
    })?;

    tracing::info!("Experiment time {} min from column {}", time.minutes(), column);
    Ok(time)
}
