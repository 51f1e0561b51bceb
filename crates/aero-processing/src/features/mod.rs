//! Feature engineering for the IATA-availability classifier.
//!
//! Derives the binary `has_iata` target and a feature matrix of the three
//! coordinate columns plus one-hot country indicators with top-K
//! bucketing. Categories beyond the K most frequent collapse into the
//! literal `"Other"` bucket; the one-hot encoding drops one baseline
//! category to avoid linear dependency among the indicators.
//!
//! Encoding conventions, pinned by tests:
//! - top-K ranking sorts by frequency descending, ties broken by first
//!   appearance in the column (stable);
//! - bucketed categories are ordered lexicographically and the first is
//!   dropped as the baseline;
//! - indicator columns are named `country_<value>`.

use crate::error::{PrepError, Result};
use crate::types::FeatureSet;
use crate::utils::{fill_numeric_nulls, is_numeric_dtype};
use polars::prelude::*;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Name of the derived target column.
pub const TARGET_COLUMN: &str = "has_iata";

/// Catch-all bucket for countries outside the top K.
pub const OTHER_BUCKET: &str = "Other";

/// Default number of country categories kept before bucketing.
pub const DEFAULT_TOP_COUNTRIES: usize = 10;

const NUMERIC_FEATURES: [&str; 3] = ["latitude", "longitude", "altitude"];

/// Builds the feature matrix and target vector for the classifier.
pub struct FeatureBuilder;

impl FeatureBuilder {
    /// Prepare features from a table.
    ///
    /// Works on a plain `DataFrame` so the column checks are meaningful:
    /// `iata`, `latitude`, `longitude`, and `altitude` are required and
    /// their absence is an [`PrepError::InvalidArgument`]; `country` is
    /// optional — without it the matrix carries only the numeric features.
    ///
    /// Numeric features are copied verbatim, then every numeric feature
    /// column with remaining missing values is filled with its own median
    /// computed over the feature matrix. The output rows align
    /// index-for-index with the input table.
    pub fn prepare(df: &DataFrame, top_countries: usize) -> Result<FeatureSet> {
        let iata = df.column("iata").map_err(|_| {
            PrepError::InvalidArgument("table has no 'iata' column".to_string())
        })?;
        let target = Self::build_target(iata.as_materialized_series())?;

        let mut feature_cols: Vec<Column> = Vec::with_capacity(NUMERIC_FEATURES.len());
        for name in NUMERIC_FEATURES {
            let column = df.column(name).map_err(|_| {
                PrepError::InvalidArgument(format!("table has no '{name}' column"))
            })?;
            if !is_numeric_dtype(column.dtype()) {
                return Err(PrepError::InvalidArgument(format!(
                    "column '{name}' is not numeric"
                )));
            }
            let series = column.as_materialized_series().cast(&DataType::Float64)?;
            feature_cols.push(Column::from(series));
        }

        if let Ok(country) = df.column("country") {
            let bucketed =
                Self::bucket_top_countries(country.as_materialized_series(), top_countries)?;
            feature_cols.extend(Self::one_hot_drop_first(&bucketed));
        } else {
            debug!("No 'country' column; using numeric features only");
        }

        let mut matrix = DataFrame::new(feature_cols)?;
        Self::fill_numeric_with_median(&mut matrix)?;

        Ok(FeatureSet { matrix, target })
    }

    /// Target: 1 iff the iata cell is present and not blank after trim.
    fn build_target(iata: &Series) -> Result<Series> {
        let ca = iata.str().map_err(|_| {
            PrepError::InvalidArgument("'iata' must be a string column".to_string())
        })?;
        let values: Int32Chunked = ca
            .into_iter()
            .map(|cell| {
                Some(match cell {
                    Some(code) if !code.trim().is_empty() => 1i32,
                    _ => 0i32,
                })
            })
            .collect();
        let mut target = values.into_series();
        target.rename(TARGET_COLUMN.into());
        Ok(target)
    }

    /// Replace every country outside the K most frequent with `"Other"`.
    /// Missing countries land in the `"Other"` bucket as well.
    fn bucket_top_countries(country: &Series, k: usize) -> Result<StringChunked> {
        let ca = country.str().map_err(|_| {
            PrepError::InvalidArgument("'country' must be a string column".to_string())
        })?;

        // frequency ranking: count descending, first appearance on ties
        let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
        for (idx, cell) in ca.into_iter().enumerate() {
            if let Some(value) = cell {
                let entry = counts.entry(value).or_insert((0, idx));
                entry.0 += 1;
            }
        }
        let mut ranked: Vec<(&str, usize, usize)> = counts
            .into_iter()
            .map(|(value, (count, first_seen))| (value, count, first_seen))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));
        let top: HashSet<&str> = ranked.iter().take(k).map(|(value, _, _)| *value).collect();

        let bucketed: StringChunked = ca
            .into_iter()
            .map(|cell| {
                Some(match cell {
                    Some(value) if top.contains(value) => value,
                    _ => OTHER_BUCKET,
                })
            })
            .collect();
        Ok(bucketed)
    }

    /// One-hot encode the bucketed categories, dropping the
    /// lexicographically first category as the baseline.
    fn one_hot_drop_first(bucketed: &StringChunked) -> Vec<Column> {
        let mut categories: Vec<&str> = bucketed
            .into_iter()
            .flatten()
            .collect::<HashSet<&str>>()
            .into_iter()
            .collect();
        categories.sort_unstable();

        categories
            .into_iter()
            .skip(1) // baseline drop
            .map(|category| {
                let indicator: Int32Chunked = bucketed
                    .into_iter()
                    .map(|cell| Some(i32::from(cell == Some(category))))
                    .collect();
                let mut series = indicator.into_series();
                series.rename(format!("country_{category}").into());
                Column::from(series)
            })
            .collect()
    }

    /// Fill residual nulls in numeric feature columns with the column's
    /// own median over the feature matrix. A column with no non-missing
    /// values has no median and is left as-is.
    fn fill_numeric_with_median(matrix: &mut DataFrame) -> Result<()> {
        let names: Vec<String> = matrix
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        for name in names {
            let column = matrix.column(&name)?;
            if column.dtype() != &DataType::Float64 || column.null_count() == 0 {
                continue;
            }
            let series = column.as_materialized_series().clone();
            if let Some(median) = series.median() {
                matrix.replace(&name, fill_numeric_nulls(&series, median)?)?;
                debug!("Filled '{}' feature nulls with median {:.4}", name, median);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn five_row_frame() -> DataFrame {
        df![
            "country" => [Some("US"), Some("US"), Some("FR"), Some("FR"), Some("FR")],
            "iata" => [Some("JFK"), Some(""), None, Some("CDG"), Some("ORY")],
            "latitude" => [Some(40.6), Some(33.9), None, Some(49.0), Some(48.7)],
            "longitude" => [Some(-73.8), Some(-118.4), Some(2.5), Some(2.5), Some(2.4)],
            "altitude" => [Some(13.0), Some(38.0), Some(392.0), Some(392.0), Some(89.0)],
        ]
        .unwrap()
    }

    #[test]
    fn test_target_derivation() {
        // empty and "\N"-sentinel (null) iata cells are both negatives
        let features = FeatureBuilder::prepare(&five_row_frame(), 1).unwrap();
        let target: Vec<i32> = features.target.i32().unwrap().into_iter().flatten().collect();
        assert_eq!(target, vec![1, 0, 0, 1, 1]);
        assert_eq!(features.target.name().as_str(), TARGET_COLUMN);
    }

    #[test]
    fn test_whitespace_iata_is_negative() {
        let df = df![
            "country" => ["US"],
            "iata" => ["   "],
            "latitude" => [1.0],
            "longitude" => [1.0],
            "altitude" => [1.0],
        ]
        .unwrap();
        let features = FeatureBuilder::prepare(&df, 1).unwrap();
        assert_eq!(features.target.i32().unwrap().get(0), Some(0));
    }

    #[test]
    fn test_top_one_country_bucketing() {
        // FR is the top-1 country; US collapses into "Other". The bucketed
        // categories {FR, Other} sort to [FR, Other] and FR is dropped as
        // the baseline, leaving a single "country_Other" indicator.
        let features = FeatureBuilder::prepare(&five_row_frame(), 1).unwrap();

        let names = features.feature_names();
        assert_eq!(
            names,
            vec!["latitude", "longitude", "altitude", "country_Other"]
        );
        let other: Vec<i32> = features
            .matrix
            .column("country_Other")
            .unwrap()
            .as_materialized_series()
            .i32()
            .unwrap()
            .into_iter()
            .flatten()
            .collect();
        assert_eq!(other, vec![1, 1, 0, 0, 0]);
    }

    #[test]
    fn test_indicator_count_bounded_by_top_countries() {
        let df = df![
            "country" => ["A", "B", "C", "D", "E", "A"],
            "iata" => ["AAA", "BBB", "CCC", "DDD", "EEE", "FFF"],
            "latitude" => [1.0, 2.0, 3.0, 4.0, 5.0, 6.0],
            "longitude" => [1.0, 2.0, 3.0, 4.0, 5.0, 6.0],
            "altitude" => [1.0, 2.0, 3.0, 4.0, 5.0, 6.0],
        ]
        .unwrap();
        for k in 1..=6 {
            let features = FeatureBuilder::prepare(&df, k).unwrap();
            let indicators = features
                .feature_names()
                .iter()
                .filter(|n| n.starts_with("country_"))
                .count();
            assert!(indicators <= k, "k={k} produced {indicators} indicators");
        }
    }

    #[test]
    fn test_frequency_ties_broken_by_first_appearance() {
        // B and A both appear twice; B appears first, so top-1 keeps B.
        let df = df![
            "country" => ["B", "A", "B", "A", "C"],
            "iata" => ["AAA", "BBB", "CCC", "DDD", "EEE"],
            "latitude" => [1.0, 2.0, 3.0, 4.0, 5.0],
            "longitude" => [1.0, 2.0, 3.0, 4.0, 5.0],
            "altitude" => [1.0, 2.0, 3.0, 4.0, 5.0],
        ]
        .unwrap();
        let features = FeatureBuilder::prepare(&df, 1).unwrap();
        // buckets {B, Other} -> B dropped as baseline, indicator is Other
        assert!(features.feature_names().contains(&"country_Other".to_string()));
        let other: Vec<i32> = features
            .matrix
            .column("country_Other")
            .unwrap()
            .as_materialized_series()
            .i32()
            .unwrap()
            .into_iter()
            .flatten()
            .collect();
        assert_eq!(other, vec![0, 1, 0, 1, 1]);
    }

    #[test]
    fn test_residual_nulls_filled_with_matrix_median() {
        let features = FeatureBuilder::prepare(&five_row_frame(), 1).unwrap();
        let latitude = features
            .matrix
            .column("latitude")
            .unwrap()
            .as_materialized_series()
            .clone();
        assert_eq!(latitude.null_count(), 0);
        // median of [40.6, 33.9, 49.0, 48.7] = 44.65
        let filled = latitude.f64().unwrap().get(2).unwrap();
        assert!((filled - 44.65).abs() < 1e-9);
    }

    #[test]
    fn test_no_nulls_anywhere_in_matrix() {
        let features = FeatureBuilder::prepare(&five_row_frame(), 3).unwrap();
        let total_nulls: usize = features
            .matrix
            .get_columns()
            .iter()
            .map(|c| c.null_count())
            .sum();
        assert_eq!(total_nulls, 0);
    }

    #[test]
    fn test_row_alignment() {
        let df = five_row_frame();
        let features = FeatureBuilder::prepare(&df, 2).unwrap();
        assert_eq!(features.len(), df.height());
        assert_eq!(features.target.len(), df.height());
    }

    #[test]
    fn test_missing_iata_column_is_invalid_argument() {
        let df = df![
            "country" => ["US"],
            "latitude" => [1.0],
            "longitude" => [1.0],
            "altitude" => [1.0],
        ]
        .unwrap();
        let err = FeatureBuilder::prepare(&df, 10).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_ARGUMENT");
        assert!(err.to_string().contains("iata"));
    }

    #[test]
    fn test_missing_coordinate_column_is_invalid_argument() {
        let df = df![
            "country" => ["US"],
            "iata" => ["JFK"],
            "latitude" => [1.0],
            "longitude" => [1.0],
        ]
        .unwrap();
        let err = FeatureBuilder::prepare(&df, 10).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_ARGUMENT");
        assert!(err.to_string().contains("altitude"));
    }

    #[test]
    fn test_country_column_is_optional() {
        let df = df![
            "iata" => ["JFK", ""],
            "latitude" => [1.0, 2.0],
            "longitude" => [1.0, 2.0],
            "altitude" => [1.0, 2.0],
        ]
        .unwrap();
        let features = FeatureBuilder::prepare(&df, 10).unwrap();
        assert_eq!(
            features.feature_names(),
            vec!["latitude", "longitude", "altitude"]
        );
    }

    #[test]
    fn test_missing_country_cells_land_in_other() {
        let df = df![
            "country" => [Some("US"), Some("US"), None],
            "iata" => [Some("JFK"), Some("LAX"), Some("XXX")],
            "latitude" => [1.0, 2.0, 3.0],
            "longitude" => [1.0, 2.0, 3.0],
            "altitude" => [1.0, 2.0, 3.0],
        ]
        .unwrap();
        let features = FeatureBuilder::prepare(&df, 1).unwrap();
        let other: Vec<i32> = features
            .matrix
            .column("country_US")
            .map(|c| {
                c.as_materialized_series()
                    .i32()
                    .unwrap()
                    .into_iter()
                    .flatten()
                    .collect()
            })
            .unwrap();
        // buckets {Other, US} -> Other dropped as baseline; null row is Other
        assert_eq!(other, vec![1, 1, 0]);
    }
}
