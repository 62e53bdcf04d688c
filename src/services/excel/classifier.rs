use regex::{Regex, RegexBuilder};

use super::error::ClassifyError;
use super::types::{ColumnId, TableView};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ColumnScore {
    index: usize,
    matches: usize,
}

fn compile(pattern: &str) -> Result<Regex, ClassifyError> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|source| ClassifyError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })
}

fn score_column(view: &impl TableView, index: usize, regex: &Regex) -> ColumnScore {
    let matches = view
        .column_cells(index)
        .filter_map(|cell| cell.as_match_str())
        .filter(|text| regex.is_match(text))
        .count();
    ColumnScore { index, matches }
}

/// Finds the column whose cells match `pattern` most often.
///
/// `pattern` is a case-insensitive regex searched within each text cell;
/// numeric and other non-text cells never match. Ties go to the leftmost
/// column. A view where no cell matches yields [`ClassifyError::NoMatch`].
pub fn most_abundant_column(view: &impl TableView, pattern: &str) -> Result<ColumnId, ClassifyError> {
    let regex = compile(pattern)?;

    let mut best: Option<ColumnScore> = None;
    for index in 0..view.column_count() {
        let score = score_column(view, index, &regex);
        tracing::trace!("pattern `{}` column {}: {} matches", pattern, index, score.matches);
        if score.matches > best.map_or(0, |b| b.matches) {
            best = Some(score);
        }
    }

    match best {
        Some(score) => {
            let column = ColumnId::of(view, score.index);
            tracing::debug!("pattern `{}` -> column {} with {} matches", pattern, column, score.matches);
            Ok(column)
        }
        None => Err(ClassifyError::NoMatch {
            pattern: pattern.to_string(),
        }),
    }
}
