use serde::Serialize;
use std::borrow::Cow;
use std::fmt;

use super::error::RowProcessingError;

/// A single spreadsheet cell after loading.
///
/// `Empty` is the explicit blank sentinel; its string form is `""`.
/// `Other` keeps the display form of booleans, dates and error cells, which
/// never take part in pattern matching.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Other(String),
}

impl Cell {
    /// String form used for pattern matching. Non-string cells yield `None`.
    pub fn as_match_str(&self) -> Option<&str> {
        match self {
            Cell::Empty => Some(""),
            Cell::Text(s) => Some(s),
            Cell::Number(_) | Cell::Other(_) => None,
        }
    }

    pub fn display(&self) -> Cow<'_, str> {
        match self {
            Cell::Empty => Cow::Borrowed(""),
            Cell::Text(s) | Cell::Other(s) => Cow::Borrowed(s),
            Cell::Number(n) => Cow::Owned(n.to_string()),
        }
    }

    /// Numeric value of the cell, parsing trimmed text when needed.
    pub fn to_number(&self) -> Option<f64> {
        match self {
            Cell::Number(n) => Some(*n),
            Cell::Text(s) => s.trim().parse::<f64>().ok(),
            Cell::Empty | Cell::Other(_) => None,
        }
    }

    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        if value.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(value.to_string())
        }
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Column {
    label: String,
    cells: Vec<Cell>,
}

/// Rectangular, immutable table of cells in original sheet order.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
    row_count: usize,
}

impl Table {
    /// Builds a table from row-major data. Short rows are padded with
    /// `Cell::Empty`; rows longer than the label list widen the table.
    pub fn from_rows(labels: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        let width = rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(labels.len()))
            .max()
            .unwrap_or(0);
        let row_count = rows.len();

        let mut columns: Vec<Column> = (0..width)
            .map(|idx| Column {
                label: labels
                    .get(idx)
                    .cloned()
                    .unwrap_or_else(|| format!("column_{}", idx)),
                cells: Vec::with_capacity(row_count),
            })
            .collect();

        for row in rows {
            let mut cells = row.into_iter();
            for column in columns.iter_mut() {
                column.cells.push(cells.next().unwrap_or(Cell::Empty));
            }
        }

        Self { columns, row_count }
    }
}

/// Read access shared by [`Table`] and [`RowSubset`].
///
/// Row indices are relative to the view.
pub trait TableView {
    fn row_count(&self) -> usize;
    fn column_count(&self) -> usize;
    fn column_label(&self, column: usize) -> &str;
    fn cell(&self, row: usize, column: usize) -> &Cell;

    fn column_cells(&self, column: usize) -> Box<dyn Iterator<Item = &Cell> + '_> {
        Box::new((0..self.row_count()).map(move |row| self.cell(row, column)))
    }
}

impl TableView for Table {
    fn row_count(&self) -> usize {
        self.row_count
    }

    fn column_count(&self) -> usize {
        self.columns.len()
    }

    fn column_label(&self, column: usize) -> &str {
        &self.columns[column].label
    }

    fn cell(&self, row: usize, column: usize) -> &Cell {
        &self.columns[column].cells[row]
    }

    fn column_cells(&self, column: usize) -> Box<dyn Iterator<Item = &Cell> + '_> {
        Box::new(self.columns[column].cells.iter())
    }
}

/// Lens over a subset of a table's rows, in original row order.
#[derive(Debug, Clone)]
pub struct RowSubset<'a> {
    table: &'a Table,
    rows: Vec<usize>,
}

impl<'a> RowSubset<'a> {
    pub fn new(table: &'a Table, rows: Vec<usize>) -> Self {
        debug_assert!(rows.windows(2).all(|w| w[0] < w[1]));
        Self { table, rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index in the underlying table of the view's `row`.
    pub fn source_row(&self, row: usize) -> usize {
        self.rows[row]
    }

    pub fn source_rows(&self) -> &[usize] {
        &self.rows
    }

    /// Same lens without its first row.
    pub fn without_first_row(&self) -> RowSubset<'a> {
        RowSubset {
            table: self.table,
            rows: self.rows.iter().skip(1).copied().collect(),
        }
    }
}

impl TableView for RowSubset<'_> {
    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn column_count(&self) -> usize {
        self.table.column_count()
    }

    fn column_label(&self, column: usize) -> &str {
        self.table.column_label(column)
    }

    fn cell(&self, row: usize, column: usize) -> &Cell {
        self.table.cell(self.rows[row], column)
    }
}

/// Column picked by the classifier or the activity resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnId {
    pub index: usize,
    pub label: String,
}

impl ColumnId {
    pub fn of(view: &impl TableView, index: usize) -> Self {
        Self {
            index,
            label: view.column_label(index).to_string(),
        }
    }
}

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} ({})", self.index, self.label)
    }
}

/// Assay duration in minutes; always finite and strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ExperimentTime(f64);

impl ExperimentTime {
    /// `None` unless `minutes` is finite and strictly positive.
    pub fn new(minutes: f64) -> Option<Self> {
        (minutes.is_finite() && minutes > 0.0).then_some(Self(minutes))
    }

    pub fn minutes(self) -> f64 {
        self.0
    }

    pub fn normalize(self, raw_activity: f64) -> f64 {
        raw_activity / self.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractionResult {
    pub name: String,
    pub normalized_activity: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExtractionReport {
    pub experiment_time: ExperimentTime,
    /// Lane rows that carried a sample name.
    pub rows_considered: usize,
    pub records: Vec<ExtractionResult>,
    pub row_errors: Vec<RowProcessingError>,
}

impl ExtractionReport {
    pub fn empty(experiment_time: ExperimentTime) -> Self {
        Self {
            experiment_time,
            rows_considered: 0,
            records: Vec::new(),
            row_errors: Vec::new(),
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "{} of {} rows extracted, {} failed",
            self.records.len(),
            self.rows_considered,
            self.row_errors.len()
        )
    }
}
