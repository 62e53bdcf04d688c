use calamine::{open_workbook_auto_from_rs, Data, Reader};
use std::collections::HashSet;
use std::io::Cursor;
use std::path::Path;

use super::error::LoadError;
use super::types::{Cell, Table, TableView};
use super::utils::{column_label, file_extension};

/// Loads the first sheet of a spreadsheet held in memory.
///
/// `format` is the file extension (`xlsx`, `xls`, `ods`, `csv`, ...). The
/// first sheet row supplies the column labels; the remaining rows become
/// the table's data rows in their original order.
pub fn load_table(data: &[u8], format: &str) -> Result<Table, LoadError> {
    let start = std::time::Instant::now();
    let format = format.trim_start_matches('.').to_ascii_lowercase();

    let rows = match format.as_str() {
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => read_workbook_rows(data)?,
        "csv" => read_csv_rows(data)?,
        other => return Err(LoadError::UnsupportedFormat(other.to_string())),
    };

    let table = build_table(rows)?;
    tracing::info!(
        "Loaded {} table: {} rows x {} columns in {:?}",
        format,
        table.row_count(),
        table.column_count(),
        start.elapsed()
    );
    Ok(table)
}

/// Reads a spreadsheet file, picking the format from its extension.
pub fn load_table_from_path(path: &Path) -> Result<Table, LoadError> {
    let format = path
        .to_str()
        .and_then(file_extension)
        .ok_or_else(|| LoadError::UnsupportedFormat(path.display().to_string()))?;
    let data = std::fs::read(path)?;
    load_table(&data, &format)
}

fn read_workbook_rows(data: &[u8]) -> Result<Vec<Vec<Cell>>, LoadError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(data))?;

    let sheet_names = workbook.sheet_names().to_vec();
    tracing::debug!("Found {} sheets: {:?}", sheet_names.len(), sheet_names);
    if sheet_names.len() > 1 {
        tracing::warn!("Only the first sheet ({}) is read", sheet_names[0]);
    }

    let range = workbook
        .worksheet_range_at(0)
        .ok_or(LoadError::NoSheets)??;

    Ok(range
        .rows()
        .map(|row| row.iter().map(cell_from_data).collect())
        .collect())
}

fn read_csv_rows(data: &[u8]) -> Result<Vec<Vec<Cell>>, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(data);

    reader
        .records()
        .map(|record| -> Result<Vec<Cell>, LoadError> {
            Ok(record?.iter().map(Cell::from).collect())
        })
        .collect()
}

fn cell_from_data(value: &Data) -> Cell {
    match value {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::from(s.as_str()),
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        other => Cell::Other(other.to_string()),
    }
}

fn build_table(rows: Vec<Vec<Cell>>) -> Result<Table, LoadError> {
    let mut rows = rows.into_iter();
    let header = rows.next().ok_or(LoadError::NoColumns)?;

    let mut existing_labels = HashSet::new();
    let labels = header
        .iter()
        .enumerate()
        .map(|(idx, cell)| column_label(&cell.display(), idx, &mut existing_labels))
        .collect();

    let table = Table::from_rows(labels, rows.collect());
    if table.column_count() == 0 {
        return Err(LoadError::NoColumns);
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHEET: &str = "\
Assay,,Notes
time (min),,
10,Lane 1,pcdna
,Lane 2,
";

    #[test]
    fn csv_header_becomes_labels_and_blanks_become_empty() {
        let table = load_table(SHEET.as_bytes(), "csv").unwrap();

        assert_eq!(table.column_count(), 3);
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.column_label(0), "Assay");
        assert_eq!(table.column_label(1), "column_1");
        assert_eq!(table.cell(0, 0), &Cell::Text("time (min)".into()));
        assert_eq!(table.cell(0, 1), &Cell::Empty);
        assert_eq!(table.cell(2, 2), &Cell::Empty);
    }

    #[test]
    fn loading_twice_yields_identical_tables() {
        let first = load_table(SHEET.as_bytes(), "csv").unwrap();
        let second = load_table(SHEET.as_bytes(), ".CSV").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn ragged_csv_rows_are_padded() {
        let table = load_table(b"a,b\n1\n2,3,4\n", "csv").unwrap();
        assert_eq!(table.column_count(), 3);
        assert_eq!(table.cell(0, 1), &Cell::Empty);
        assert_eq!(table.cell(1, 2), &Cell::Text("4".into()));
    }

    #[test]
    fn empty_source_has_no_columns() {
        assert!(matches!(load_table(b"", "csv"), Err(LoadError::NoColumns)));
    }

    #[test]
    fn unsupported_format_is_rejected() {
        assert!(matches!(
            load_table(b"whatever", "txt"),
            Err(LoadError::UnsupportedFormat(f)) if f == "txt"
        ));
    }

    #[test]
    fn corrupt_workbook_fails_to_load() {
        assert!(matches!(
            load_table(b"definitely not a zip archive", "xlsx"),
            Err(LoadError::Workbook(_))
        ));
    }

    #[test]
    fn workbook_cells_map_to_table_cells() {
        assert_eq!(cell_from_data(&Data::Int(3)), Cell::Number(3.0));
        assert_eq!(cell_from_data(&Data::String(String::new())), Cell::Empty);
        assert_eq!(cell_from_data(&Data::Bool(true)), Cell::Other("true".into()));
    }
}
