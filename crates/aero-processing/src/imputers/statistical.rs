//! Statistical imputation strategies.
//!
//! [`Imputer::fill`] replaces every missing cell in the selected columns
//! with one scalar computed from that column's own non-missing values (or
//! a caller-supplied constant). The operation is pure: it returns a new
//! table and never mutates its input, which also makes it idempotent.

use crate::error::{PrepError, Result};
use crate::table::{AIRPORT_COLUMNS, AirportTable};
use crate::utils::{
    fill_numeric_nulls, fill_string_nulls, is_numeric_dtype, numeric_mode, string_mode,
};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::debug;

/// Strategy for computing a column's fill value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FillStrategy {
    /// Mean of the column's non-missing values (numeric columns).
    Mean,
    /// Median of the column's non-missing values (numeric columns).
    #[default]
    Median,
    /// Most frequent non-missing value; ties resolve to the smallest value.
    Mode,
    /// A caller-supplied constant (0 / "0" when none is given).
    Constant,
}

impl FillStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mean => "mean",
            Self::Median => "median",
            Self::Mode => "mode",
            Self::Constant => "constant",
        }
    }
}

impl FromStr for FillStrategy {
    type Err = PrepError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mean" => Ok(Self::Mean),
            "median" => Ok(Self::Median),
            "mode" => Ok(Self::Mode),
            "constant" => Ok(Self::Constant),
            other => Err(PrepError::InvalidArgument(format!(
                "unknown fill strategy '{other}' (expected mean, median, mode, or constant)"
            ))),
        }
    }
}

/// Constant fill value for [`FillStrategy::Constant`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FillConstant {
    Number(f64),
    Text(String),
}

impl From<f64> for FillConstant {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for FillConstant {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// Fills missing values in airport tables.
pub struct Imputer;

impl Imputer {
    /// Fill missing cells in `columns` (all 14 columns when `None`).
    ///
    /// Requested columns absent from the table are silently skipped, and
    /// columns without missing cells are left untouched. A column whose
    /// values are all missing is only filled when the strategy yields a
    /// fallback (mode: 0 / empty string; constant: always).
    ///
    /// Mean and median requested on a non-numeric column degrade to the
    /// mode rule for that column. This mirrors the historical behavior of
    /// the pipeline and is pinned by test; see the mode-fallback note in
    /// DESIGN.md.
    pub fn fill(
        table: &AirportTable,
        strategy: FillStrategy,
        columns: Option<&[&str]>,
        constant: Option<&FillConstant>,
    ) -> Result<AirportTable> {
        let mut df = table.as_df().clone();
        let requested: Vec<&str> = match columns {
            Some(cols) => cols.to_vec(),
            None => AIRPORT_COLUMNS.to_vec(),
        };

        for name in requested {
            let Ok(column) = df.column(name) else {
                debug!("Skipping '{}': not present in table", name);
                continue;
            };
            if column.null_count() == 0 {
                continue;
            }
            let series = column.as_materialized_series().clone();
            if let Some(filled) = Self::fill_series(&series, strategy, constant)? {
                df.replace(name, filled)?;
                debug!("Filled '{}' using {} strategy", name, strategy.as_str());
            }
        }

        AirportTable::new(df)
    }

    /// Compute the filled series, or `None` when the strategy yields no
    /// fill value for this column.
    fn fill_series(
        series: &Series,
        strategy: FillStrategy,
        constant: Option<&FillConstant>,
    ) -> Result<Option<Series>> {
        let numeric = is_numeric_dtype(series.dtype());

        match strategy {
            FillStrategy::Mean if numeric => match series.mean() {
                Some(mean) => Ok(Some(fill_numeric_nulls(series, mean)?)),
                None => Ok(None),
            },
            FillStrategy::Median if numeric => match series.median() {
                Some(median) => Ok(Some(fill_numeric_nulls(series, median)?)),
                None => Ok(None),
            },
            FillStrategy::Mean | FillStrategy::Median => {
                // mode-fallback rule for non-numeric columns
                debug!(
                    "{} requested on non-numeric column '{}', falling back to mode",
                    strategy.as_str(),
                    series.name()
                );
                Self::mode_fill(series).map(Some)
            }
            FillStrategy::Mode => Self::mode_fill(series).map(Some),
            FillStrategy::Constant => Self::constant_fill(series, constant).map(Some),
        }
    }

    /// Mode rule: most frequent non-missing value; an all-missing column
    /// falls back to 0 (numeric) or the empty string (text).
    fn mode_fill(series: &Series) -> Result<Series> {
        if is_numeric_dtype(series.dtype()) {
            let fill = numeric_mode(series).unwrap_or(0.0);
            Ok(fill_numeric_nulls(series, fill)?)
        } else {
            let fill = string_mode(series).unwrap_or_default();
            Ok(fill_string_nulls(series, &fill)?)
        }
    }

    fn constant_fill(series: &Series, constant: Option<&FillConstant>) -> Result<Series> {
        if is_numeric_dtype(series.dtype()) {
            let value = match constant {
                None => 0.0,
                Some(FillConstant::Number(v)) => *v,
                Some(FillConstant::Text(t)) => t.trim().parse::<f64>().map_err(|_| {
                    PrepError::InvalidArgument(format!(
                        "constant '{}' is not numeric for column '{}'",
                        t,
                        series.name()
                    ))
                })?,
            };
            Ok(fill_numeric_nulls(series, value)?)
        } else {
            let value = match constant {
                None => "0".to_string(),
                Some(FillConstant::Number(v)) => format!("{v}"),
                Some(FillConstant::Text(t)) => t.clone(),
            };
            Ok(fill_string_nulls(series, &value)?)
        }
    }
}
