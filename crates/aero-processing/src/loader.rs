//! OpenFlights airport data ingestion.
//!
//! Reads the headerless `airports.dat` format (14 fields per row, `\N` as
//! the missing-value sentinel) from a local path or an HTTP(S) URL into a
//! validated [`AirportTable`]. Every column is read as a string first; the
//! four numeric columns are then coerced to `Float64` with a non-strict
//! cast, so unparseable cells become null instead of failing the load.

use crate::error::{PrepError, Result};
use crate::table::{AIRPORT_COLUMNS, AirportTable, NUMERIC_COLUMNS};
use polars::io::csv::read::{CsvParseOptions, CsvReadOptions};
use polars::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Missing-value sentinel used by the OpenFlights dumps.
pub const MISSING_SENTINEL: &str = "\\N";

/// Loads airport record tables from local paths or URLs.
///
/// Stateless; every call re-reads the source.
pub struct RecordLoader;

impl RecordLoader {
    /// Load an airport table from a local path or an `http(s)://` URL.
    ///
    /// # Errors
    ///
    /// - [`PrepError::InvalidArgument`] for an empty source string, before
    ///   any I/O is attempted.
    /// - [`PrepError::NotFound`] when the path does not exist or the server
    ///   answers 404.
    /// - [`PrepError::LoadFailure`] for any other I/O, transport, or parse
    ///   error, wrapping the underlying cause.
    pub fn load(source: &str) -> Result<AirportTable> {
        if source.trim().is_empty() {
            return Err(PrepError::InvalidArgument(
                "source must be a non-empty path or URL".to_string(),
            ));
        }

        info!("Loading airport records from '{}'", source);
        let df = if is_url(source) {
            Self::read_remote(source)?
        } else {
            Self::read_local(source)?
        };

        let df = Self::coerce_numeric(df, source)?;
        let table = AirportTable::new(df)?;
        debug!("Loaded {} rows", table.height());
        Ok(table)
    }

    fn read_local(path: &str) -> Result<DataFrame> {
        if !Path::new(path).exists() {
            return Err(PrepError::NotFound(path.to_string()));
        }
        Self::reader_options()
            .try_into_reader_with_file_path(Some(PathBuf::from(path)))
            .map_err(|e| load_failure(path, e))?
            .finish()
            .map_err(|e| load_failure(path, e))
    }

    #[cfg(feature = "remote")]
    fn read_remote(url: &str) -> Result<DataFrame> {
        let response = reqwest::blocking::get(url).map_err(|e| load_failure(url, e))?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(PrepError::NotFound(url.to_string()));
        }
        let response = response
            .error_for_status()
            .map_err(|e| load_failure(url, e))?;
        let body = response.bytes().map_err(|e| load_failure(url, e))?;

        Self::reader_options()
            .into_reader_with_file_handle(std::io::Cursor::new(body.to_vec()))
            .finish()
            .map_err(|e| load_failure(url, e))
    }

    #[cfg(not(feature = "remote"))]
    fn read_remote(url: &str) -> Result<DataFrame> {
        Err(PrepError::InvalidArgument(format!(
            "remote sources require the 'remote' feature: {url}"
        )))
    }

    /// CSV options for the OpenFlights format: no header, fixed column
    /// names, everything read as a string, `\N` null on every column.
    fn reader_options() -> CsvReadOptions {
        let fields = AIRPORT_COLUMNS
            .iter()
            .map(|name| Field::new((*name).into(), DataType::String));
        CsvReadOptions::default()
            .with_has_header(false)
            .with_schema(Some(Arc::new(Schema::from_iter(fields))))
            .with_parse_options(
                CsvParseOptions::default()
                    .with_quote_char(Some(b'"'))
                    .with_null_values(Some(NullValues::AllColumnsSingle(
                        MISSING_SENTINEL.into(),
                    ))),
            )
    }

    /// Coerce the numeric columns to `Float64`. The cast is non-strict:
    /// unparseable cells become null rather than raising.
    fn coerce_numeric(mut df: DataFrame, source: &str) -> Result<DataFrame> {
        for name in NUMERIC_COLUMNS {
            let coerced = df
                .column(name)
                .map_err(|e| load_failure(source, e))?
                .cast(&DataType::Float64)
                .map_err(|e| load_failure(source, e))?;
            df.replace(name, coerced.take_materialized_series())
                .map_err(|e| load_failure(source, e))?;
        }
        Ok(df)
    }
}

fn is_url(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

fn load_failure(
    source: &str,
    cause: impl std::error::Error + Send + Sync + 'static,
) -> PrepError {
    PrepError::LoadFailure {
        source_id: source.to_string(),
        cause: Box::new(cause),
    }
}
