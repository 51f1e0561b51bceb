//! Shared data types for the preparation pipeline.

use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Missingness of a single column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnMissingness {
    pub column: String,
    pub missing_count: usize,
    pub missing_percent: f64,
}

/// Per-column missingness, sorted by percent descending.
///
/// Only columns with at least one missing cell appear; an empty table
/// yields an empty report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MissingnessReport {
    pub columns: Vec<ColumnMissingness>,
}

impl MissingnessReport {
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Look up the report row for a column, if it has missing values.
    pub fn get(&self, column: &str) -> Option<&ColumnMissingness> {
        self.columns.iter().find(|c| c.column == column)
    }

    /// Serialize the report as pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Feature matrix and aligned target vector produced by
/// [`crate::features::FeatureBuilder`].
#[derive(Debug, Clone)]
pub struct FeatureSet {
    /// Numeric features plus one-hot country indicators.
    pub matrix: DataFrame,
    /// `has_iata` target, Int32, aligned index-for-index with the matrix.
    pub target: Series,
}

impl FeatureSet {
    /// Number of rows (== source table row count).
    pub fn len(&self) -> usize {
        self.matrix.height()
    }

    pub fn is_empty(&self) -> bool {
        self.matrix.height() == 0
    }

    pub fn feature_names(&self) -> Vec<String> {
        self.matrix
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect()
    }
}

/// Result of a full pipeline run.
#[derive(Debug)]
pub struct PipelineResult {
    /// The cleaned table after imputation.
    pub table: crate::table::AirportTable,
    /// Missingness diagnostic computed on the raw table, before imputation.
    pub missingness: MissingnessReport,
    /// Feature matrix and target for the downstream classifier.
    pub features: FeatureSet,
    /// Human-readable audit trail of what the pipeline did.
    pub processing_steps: Vec<String>,
    /// RFC 3339 timestamp of when the run finished.
    pub completed_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_lookup() {
        let report = MissingnessReport {
            columns: vec![
                ColumnMissingness {
                    column: "iata".to_string(),
                    missing_count: 3,
                    missing_percent: 60.0,
                },
                ColumnMissingness {
                    column: "altitude".to_string(),
                    missing_count: 1,
                    missing_percent: 20.0,
                },
            ],
        };
        assert_eq!(report.len(), 2);
        assert_eq!(report.get("iata").unwrap().missing_count, 3);
        assert!(report.get("city").is_none());
    }

    #[test]
    fn test_report_serialization() {
        let report = MissingnessReport {
            columns: vec![ColumnMissingness {
                column: "timezone".to_string(),
                missing_count: 2,
                missing_percent: 40.0,
            }],
        };
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("timezone"));
        assert!(json.contains("40"));

        let back: MissingnessReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report);
    }

    #[test]
    fn test_feature_set_names() {
        let features = FeatureSet {
            matrix: df!["latitude" => [1.0], "country_Other" => [0i32]].unwrap(),
            target: Series::new("has_iata".into(), &[1i32]),
        };
        assert_eq!(features.len(), 1);
        assert_eq!(
            features.feature_names(),
            vec!["latitude".to_string(), "country_Other".to_string()]
        );
    }
}
