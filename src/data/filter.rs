use std::path::Path;

use super::table::Table;
use crate::error::{Result, WorkflowError};

// ---------------------------------------------------------------------------
// Filter predicate: closed latitude interval
// ---------------------------------------------------------------------------

/// A closed interval `[min, max]` over a numeric column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatitudeBand {
    pub min: f64,
    pub max: f64,
}

impl LatitudeBand {
    /// Ten degrees either side of the equator.
    pub const TROPICS: LatitudeBand = LatitudeBand {
        min: -10.0,
        max: 10.0,
    };

    pub fn new(min: f64, max: f64) -> Self {
        LatitudeBand { min, max }
    }

    /// Both ends inclusive. NaN is never inside.
    pub fn contains(&self, v: f64) -> bool {
        self.min <= v && v <= self.max
    }
}

/// Boolean mask over a numeric column. Cells that failed to parse are `false`.
pub fn between(values: &[Option<f64>], band: LatitudeBand) -> Vec<bool> {
    values
        .iter()
        .map(|v| v.is_some_and(|v| band.contains(v)))
        .collect()
}

/// Return the rows of `table` whose `column` value lies inside `band`.
///
/// `source` is only used to name the file in a `MissingColumn` error.
pub fn filter_rows(table: &Table, column: &str, band: LatitudeBand, source: &Path) -> Result<Table> {
    let values = table
        .column_f64(column)
        .ok_or_else(|| WorkflowError::MissingColumn {
            path: source.to_path_buf(),
            column: column.to_string(),
        })?;

    let unparsed = values.iter().filter(|v| v.is_none()).count();
    if unparsed > 0 {
        log::warn!(
            "{unparsed} row(s) in {} have a non-numeric '{column}' and were dropped",
            source.display()
        );
    }

    let mask = between(&values, band);
    Ok(table.select(&mask))
}
