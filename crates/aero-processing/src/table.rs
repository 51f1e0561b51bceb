//! Typed airport table.
//!
//! [`AirportTable`] wraps a polars `DataFrame` and is the single validation
//! entry point for the pipeline: construction fails fast unless the frame
//! carries the full OpenFlights column set with the expected dtypes.
//! Downstream components accept a validated table and return new values;
//! no operation mutates a caller's table in place.

use crate::error::{PrepError, Result};
use polars::prelude::*;

/// The fixed OpenFlights airport column set, in file order.
pub const AIRPORT_COLUMNS: [&str; 14] = [
    "airport_id",
    "name",
    "city",
    "country",
    "iata",
    "icao",
    "latitude",
    "longitude",
    "altitude",
    "timezone",
    "dst",
    "tz_db",
    "type",
    "source",
];

/// Columns coerced to `Float64` during loading.
pub const NUMERIC_COLUMNS: [&str; 4] = ["latitude", "longitude", "altitude", "timezone"];

/// A validated airport record table.
///
/// All 14 columns are guaranteed present: the four numeric columns as
/// `Float64`, the rest as `String`. Cells may be null (missing).
#[derive(Debug, Clone)]
pub struct AirportTable {
    df: DataFrame,
}

impl AirportTable {
    /// Validate a DataFrame and wrap it as an airport table.
    ///
    /// Fails with [`PrepError::InvalidArgument`] when a required column is
    /// absent or carries the wrong dtype. No coercion happens here; see
    /// [`crate::loader::RecordLoader`] for lossy-safe numeric coercion.
    pub fn new(df: DataFrame) -> Result<Self> {
        for name in AIRPORT_COLUMNS {
            let column = df.column(name).map_err(|_| {
                PrepError::InvalidArgument(format!("required column '{name}' is missing"))
            })?;
            let expected = if NUMERIC_COLUMNS.contains(&name) {
                DataType::Float64
            } else {
                DataType::String
            };
            if column.dtype() != &expected {
                return Err(PrepError::InvalidArgument(format!(
                    "column '{name}' has dtype {:?}, expected {:?}",
                    column.dtype(),
                    expected
                )));
            }
        }
        Ok(Self { df })
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.df.height()
    }

    /// Borrow the underlying DataFrame.
    pub fn as_df(&self) -> &DataFrame {
        &self.df
    }

    /// Unwrap into the underlying DataFrame.
    pub fn into_df(self) -> DataFrame {
        self.df
    }

    /// Borrow a column by name.
    pub fn column(&self, name: &str) -> Result<&Column> {
        self.df
            .column(name)
            .map_err(|_| PrepError::ColumnNotFound(name.to_string()))
    }

    /// Typed accessor for a numeric column.
    fn float_column(&self, name: &str) -> Result<&Float64Chunked> {
        Ok(self.column(name)?.as_materialized_series().f64()?)
    }

    /// Typed accessor for a text column.
    fn string_column(&self, name: &str) -> Result<&StringChunked> {
        Ok(self.column(name)?.as_materialized_series().str()?)
    }

    pub fn latitude(&self) -> Result<&Float64Chunked> {
        self.float_column("latitude")
    }

    pub fn longitude(&self) -> Result<&Float64Chunked> {
        self.float_column("longitude")
    }

    pub fn altitude(&self) -> Result<&Float64Chunked> {
        self.float_column("altitude")
    }

    pub fn timezone_offset(&self) -> Result<&Float64Chunked> {
        self.float_column("timezone")
    }

    pub fn iata(&self) -> Result<&StringChunked> {
        self.string_column("iata")
    }

    pub fn country(&self) -> Result<&StringChunked> {
        self.string_column("country")
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Build a small valid airport frame for tests, with defaults for the
    /// columns a test does not care about.
    pub(crate) fn airport_frame(
        countries: &[Option<&str>],
        iata: &[Option<&str>],
        latitude: &[Option<f64>],
        longitude: &[Option<f64>],
        altitude: &[Option<f64>],
    ) -> DataFrame {
        let n = countries.len();
        assert_eq!(iata.len(), n);
        let ids: Vec<Option<String>> = (0..n).map(|i| Some((i + 1).to_string())).collect();
        let names: Vec<Option<&str>> = vec![Some("Test Airport"); n];
        df![
            "airport_id" => ids,
            "name" => names.clone(),
            "city" => names.clone(),
            "country" => countries.to_vec(),
            "iata" => iata.to_vec(),
            "icao" => names.clone(),
            "latitude" => latitude.to_vec(),
            "longitude" => longitude.to_vec(),
            "altitude" => altitude.to_vec(),
            "timezone" => vec![Some(1.0); n],
            "dst" => vec![Some("U"); n],
            "tz_db" => vec![Some("UTC"); n],
            "type" => vec![Some("airport"); n],
            "source" => vec![Some("Test"); n],
        ]
        .unwrap()
    }
}
