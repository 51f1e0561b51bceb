//! Imputation module for handling missing values.
//!
//! Provides the statistical fill strategies (mean, median, mode, constant)
//! over validated airport tables.

mod statistical;

pub use statistical::{FillConstant, FillStrategy, Imputer};
