//! Shared utilities for the data preparation pipeline.

use polars::prelude::*;

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Fill null values in a `Float64` Series with a specific value.
pub fn fill_numeric_nulls(series: &Series, fill_value: f64) -> PolarsResult<Series> {
    Ok(series
        .f64()?
        .fill_null_with_values(fill_value)?
        .into_series())
}

/// Fill null values in a string Series with a specific value.
pub fn fill_string_nulls(series: &Series, fill_value: &str) -> PolarsResult<Series> {
    let ca = series.str()?;
    let filled: StringChunked = ca
        .into_iter()
        .map(|opt| Some(opt.unwrap_or(fill_value)))
        .collect();
    Ok(filled.with_name(series.name().clone()).into_series())
}

/// Calculate the mode (most frequent value) of a string Series.
///
/// Ties resolve to the lexicographically smallest value, so the result is
/// deterministic regardless of row order.
pub fn string_mode(series: &Series) -> Option<String> {
    let ca = series.str().ok()?;
    let mut counts: std::collections::HashMap<&str, usize> = std::collections::HashMap::new();
    for val in ca.into_iter().flatten() {
        *counts.entry(val).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .max_by(|(a_val, a_count), (b_val, b_count)| {
            a_count.cmp(b_count).then_with(|| b_val.cmp(a_val))
        })
        .map(|(val, _)| val.to_string())
}

/// Calculate the mode of a `Float64` Series, ignoring non-finite values.
///
/// Ties resolve to the smallest value.
pub fn numeric_mode(series: &Series) -> Option<f64> {
    let ca = series.f64().ok()?;
    let mut counts: Vec<(f64, usize)> = Vec::new();
    for val in ca.into_iter().flatten() {
        if !val.is_finite() {
            continue;
        }
        match counts.iter_mut().find(|(v, _)| *v == val) {
            Some((_, count)) => *count += 1,
            None => counts.push((val, 1)),
        }
    }
    counts
        .into_iter()
        .max_by(|(a_val, a_count), (b_val, b_count)| {
            a_count.cmp(b_count).then_with(|| b_val.total_cmp(a_val))
        })
        .map(|(val, _)| val)
}
