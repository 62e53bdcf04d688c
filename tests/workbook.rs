use lane_activity::services::excel::{
    extract_bytes, load_table, Cell, ExtractionResult, TableView,
};
use rust_xlsxwriter::{Workbook, Worksheet};

/* ---------- fixtures ---------- */

const SCENARIO_A: &[&[&str]] = &[
    &["Run sheet"],
    &["time (min)", "Sample", "Lane", "pmol/mg", "pmol/mg/min"],
    &["10", "pcdna", "Lane 1", "40", "4"],
    &["", "wt", "Lane 2", "25", "2.5"],
    &["", "", "Lane 3", "99", "9.9"],
];

const LATER_RUN: &[&[&str]] = &[
    &["Second run"],
    &["time (min)", "Sample", "Lane", "pmol/mg"],
    &["20", "blank", "Lane 1", "80"],
];

/// Numeric-looking entries become number cells, blanks are left unwritten.
fn write_grid(sheet: &mut Worksheet, grid: &[&[&str]]) {
    for (row, cells) in grid.iter().enumerate() {
        for (col, text) in cells.iter().enumerate() {
            let (row, col) = (row as u32, col as u16);
            if text.is_empty() {
                continue;
            }
            match text.parse::<f64>() {
                Ok(number) => sheet.write_number(row, col, number).map(|_| ()),
                Err(_) => sheet.write_string(row, col, *text).map(|_| ()),
            }
            .unwrap();
        }
    }
}

fn workbook(sheets: &[&[&[&str]]]) -> Vec<u8> {
    let mut workbook = Workbook::new();
    for grid in sheets {
        write_grid(workbook.add_worksheet(), grid);
    }
    workbook.save_to_buffer().unwrap()
}

fn result(name: &str, normalized_activity: f64) -> ExtractionResult {
    ExtractionResult {
        name: name.to_string(),
        normalized_activity,
    }
}

/* ---------- tests ---------- */

#[test]
fn xlsx_numbers_load_as_number_cells() {
    let table = load_table(&workbook(&[SCENARIO_A]), "xlsx").unwrap();

    assert_eq!(table.column_label(0), "Run sheet");
    assert_eq!(table.column_count(), 5);
    assert_eq!(table.row_count(), 4);
    assert_eq!(table.cell(1, 0), &Cell::Number(10.0));
    assert_eq!(table.cell(1, 3), &Cell::Number(40.0));
    assert_eq!(table.cell(0, 1), &Cell::from("Sample"));
    assert_eq!(table.cell(2, 0), &Cell::Empty);
}

#[test]
fn scenario_a_extracts_from_a_workbook() {
    let report = extract_bytes(&workbook(&[SCENARIO_A]), "xlsx").unwrap();

    assert_eq!(report.experiment_time.minutes(), 10.0);
    assert_eq!(report.records, vec![result("pcdna", 4.0), result("wt", 2.5)]);
    assert!(report.row_errors.is_empty());
    assert_eq!(report.summary(), "2 of 2 rows extracted, 0 failed");
}

#[test]
fn only_the_first_sheet_is_read() {
    let report = extract_bytes(&workbook(&[SCENARIO_A, LATER_RUN]), "xlsx").unwrap();

    assert_eq!(report.experiment_time.minutes(), 10.0);
    assert_eq!(report.records, vec![result("pcdna", 4.0), result("wt", 2.5)]);

    let swapped = extract_bytes(&workbook(&[LATER_RUN, SCENARIO_A]), "xlsx").unwrap();
    assert_eq!(swapped.experiment_time.minutes(), 20.0);
    assert_eq!(swapped.records, vec![result("blank", 4.0)]);
}
