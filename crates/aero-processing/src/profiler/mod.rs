//! Missingness profiling for airport tables.
//!
//! Read-only diagnostics: counts and percentages of missing cells per
//! column. Deterministic and side-effect-free; the table is never touched.

use crate::table::AirportTable;
use crate::types::{ColumnMissingness, MissingnessReport};

/// Computes per-column missingness diagnostics.
pub struct MissingnessAnalyzer;

impl MissingnessAnalyzer {
    /// Count missing cells per column, in column order.
    pub fn count_missing(table: &AirportTable) -> Vec<(String, usize)> {
        table
            .as_df()
            .get_columns()
            .iter()
            .map(|column| (column.name().to_string(), column.null_count()))
            .collect()
    }

    /// Build a missingness report: one row per column with at least one
    /// missing cell, sorted by percent descending. A zero-row table yields
    /// an empty report.
    pub fn report_missing(table: &AirportTable) -> MissingnessReport {
        let total = table.height();
        if total == 0 {
            return MissingnessReport::default();
        }

        let mut columns: Vec<ColumnMissingness> = Self::count_missing(table)
            .into_iter()
            .filter(|(_, count)| *count > 0)
            .map(|(column, missing_count)| ColumnMissingness {
                column,
                missing_count,
                missing_percent: (missing_count as f64 / total as f64) * 100.0,
            })
            .collect();

        // stable sort keeps column order among equal percentages
        columns.sort_by(|a, b| b.missing_percent.total_cmp(&a.missing_percent));

        MissingnessReport { columns }
    }
}
