//! Airport Data Preparation Library
//!
//! Cleaning and feature-engineering pipeline for the OpenFlights airports
//! dataset, built on Polars.
//!
//! # Overview
//!
//! The library covers four stages, composed linearly:
//!
//! - **Loading**: parse the headerless `airports.dat` format from a path
//!   or URL into a validated, typed table ([`RecordLoader`])
//! - **Missingness analysis**: per-column missing counts and percentages
//!   as a sorted diagnostic report ([`MissingnessAnalyzer`])
//! - **Imputation**: fill missing values per column under a selectable
//!   strategy — mean, median, mode, or constant ([`Imputer`])
//! - **Feature engineering**: derive the binary `has_iata` target and a
//!   numeric + one-hot-country feature matrix for a downstream
//!   classifier ([`FeatureBuilder`])
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use aero_processing::{PrepConfig, PrepPipeline, FillStrategy};
//!
//! let config = PrepConfig::builder("data/airports.dat")
//!     .fill_strategy(FillStrategy::Median)
//!     .top_countries(10)
//!     .build()?;
//!
//! let result = PrepPipeline::new(config)?.run()?;
//!
//! for row in &result.missingness.columns {
//!     println!("{}: {:.1}% missing", row.column, row.missing_percent);
//! }
//! println!("{} feature columns", result.features.matrix.width());
//! ```
//!
//! The stages are also usable on their own; every operation takes its
//! input by reference and returns a new value, so a table can be shared
//! freely between diagnostics and transformation steps.
//!
//! # Remote sources
//!
//! With the default `remote` feature, [`RecordLoader::load`] accepts
//! `http://` / `https://` URLs and fetches them with a blocking client.
//! Disable the feature for a purely local build.

pub mod config;
pub mod error;
pub mod features;
pub mod imputers;
pub mod loader;
pub mod pipeline;
pub mod profiler;
pub mod table;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use config::{ConfigValidationError, PrepConfig, PrepConfigBuilder};
pub use error::{PrepError, Result as PrepResult, ResultExt};
pub use features::{DEFAULT_TOP_COUNTRIES, FeatureBuilder, OTHER_BUCKET, TARGET_COLUMN};
pub use imputers::{FillConstant, FillStrategy, Imputer};
pub use loader::{MISSING_SENTINEL, RecordLoader};
pub use pipeline::PrepPipeline;
pub use profiler::MissingnessAnalyzer;
pub use table::{AIRPORT_COLUMNS, AirportTable, NUMERIC_COLUMNS};
pub use types::{ColumnMissingness, FeatureSet, MissingnessReport, PipelineResult};
