use super::classifier::most_abundant_column;
use super::error::{ExtractionError, Stage};
use super::types::{RowSubset, Table, TableView};

pub const LANE_PATTERN: &str = "lane";

/// Keeps the rows whose lane column mentions "lane", in sheet order.
///
/// An empty subset is not an error here; the caller decides what zero
/// lanes means.
pub fn subset_lanes(table: &Table) -> Result<RowSubset<'_>, ExtractionError> {
    let lane_column = most_abundant_column(table, LANE_PATTERN)
        .map_err(ExtractionError::classify(Stage::Lane))?;

    let rows: Vec<usize> = table
        .column_cells(lane_column.index)
        .enumerate()
        .filter(|(_, cell)| {
            cell.as_match_str()
                .map_or(false, |text| text.to_lowercase().contains(LANE_PATTERN))
        })
        .map(|(row, _)| row)
        .collect();

    tracing::info!("Lane column {} selects {} of {} rows", lane_column, rows.len(), table.row_count());
    Ok(RowSubset::new(table, rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::excel::error::ClassifyError;
    use crate::services::excel::types::Cell;

    fn table(rows: Vec<Vec<&str>>) -> Table {
        Table::from_rows(
            vec!["a".into(), "b".into()],
            rows.into_iter()
                .map(|row| row.into_iter().map(Cell::from).collect())
                .collect(),
        )
    }

    #[test]
    fn keeps_lane_rows_in_original_order() {
        let t = table(vec![
            vec!["header", "Lane"],
            vec!["x", "notes"],
            vec!["y", "LANE 2"],
            vec!["z", "lane 1"],
        ]);
        let subset = subset_lanes(&t).unwrap();
        assert_eq!(subset.source_rows(), &[0, 2, 3]);
    }

    #[test]
    fn missing_lane_column_is_fatal() {
        let t = table(vec![vec!["x", "y"]]);
        let err = subset_lanes(&t).unwrap_err();
        assert!(matches!(
            err,
            ExtractionError::Classify { stage: Stage::Lane, source: ClassifyError::NoMatch { .. } }
        ));
    }
}
