//! Configuration for the preparation pipeline.
//!
//! Builder-pattern configuration with validation, in the spirit of the
//! rest of the crate: construct with [`PrepConfig::builder()`], tweak,
//! then `build()` to get a validated config.

use crate::features::DEFAULT_TOP_COUNTRIES;
use crate::imputers::{FillConstant, FillStrategy};
use crate::table::NUMERIC_COLUMNS;
use serde::{Deserialize, Serialize};

/// Configuration for [`crate::pipeline::PrepPipeline`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrepConfig {
    /// Path or URL of the airports dataset.
    pub source: String,

    /// Strategy for the imputation step.
    /// Default: Median
    pub fill_strategy: FillStrategy,

    /// Columns to impute. When `None`, the four numeric columns are
    /// filled; the text columns (including `iata`, which feeds the
    /// target) are left untouched.
    pub fill_columns: Option<Vec<String>>,

    /// Constant for [`FillStrategy::Constant`].
    pub fill_constant: Option<FillConstant>,

    /// Number of country categories kept before bucketing into "Other".
    /// Default: 10
    pub top_countries: usize,
}

impl PrepConfig {
    /// Create a new configuration builder for the given source.
    pub fn builder(source: impl Into<String>) -> PrepConfigBuilder {
        PrepConfigBuilder {
            source: source.into(),
            ..Default::default()
        }
    }

    /// Columns the imputation step will operate on.
    pub fn effective_fill_columns(&self) -> Vec<&str> {
        match &self.fill_columns {
            Some(columns) => columns.iter().map(String::as_str).collect(),
            None => NUMERIC_COLUMNS.to_vec(),
        }
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.source.trim().is_empty() {
            return Err(ConfigValidationError::EmptySource);
        }
        if self.top_countries == 0 {
            return Err(ConfigValidationError::InvalidTopCountries(
                self.top_countries,
            ));
        }
        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Source must be a non-empty path or URL")]
    EmptySource,

    #[error("Invalid top_countries: {0} (must be at least 1)")]
    InvalidTopCountries(usize),
}

/// Builder for [`PrepConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct PrepConfigBuilder {
    source: String,
    fill_strategy: Option<FillStrategy>,
    fill_columns: Option<Vec<String>>,
    fill_constant: Option<FillConstant>,
    top_countries: Option<usize>,
}

impl PrepConfigBuilder {
    /// Set the imputation strategy.
    pub fn fill_strategy(mut self, strategy: FillStrategy) -> Self {
        self.fill_strategy = Some(strategy);
        self
    }

    /// Restrict imputation to specific columns.
    pub fn fill_columns(mut self, columns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.fill_columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Set the constant used by [`FillStrategy::Constant`].
    pub fn fill_constant(mut self, constant: impl Into<FillConstant>) -> Self {
        self.fill_constant = Some(constant.into());
        self
    }

    /// Set how many country categories are kept before bucketing.
    pub fn top_countries(mut self, k: usize) -> Self {
        self.top_countries = Some(k);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `PrepConfig` or an error if validation fails.
    pub fn build(self) -> Result<PrepConfig, ConfigValidationError> {
        let config = PrepConfig {
            source: self.source,
            fill_strategy: self.fill_strategy.unwrap_or_default(),
            fill_columns: self.fill_columns,
            fill_constant: self.fill_constant,
            top_countries: self.top_countries.unwrap_or(DEFAULT_TOP_COUNTRIES),
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let config = PrepConfig::builder("airports.dat").build().unwrap();
        assert_eq!(config.fill_strategy, FillStrategy::Median);
        assert_eq!(config.top_countries, 10);
        assert_eq!(
            config.effective_fill_columns(),
            vec!["latitude", "longitude", "altitude", "timezone"]
        );
    }

    #[test]
    fn test_builder_custom_values() {
        let config = PrepConfig::builder("airports.dat")
            .fill_strategy(FillStrategy::Constant)
            .fill_constant(-1.0)
            .fill_columns(["altitude"])
            .top_countries(5)
            .build()
            .unwrap();

        assert_eq!(config.fill_strategy, FillStrategy::Constant);
        assert_eq!(config.fill_constant, Some(FillConstant::Number(-1.0)));
        assert_eq!(config.effective_fill_columns(), vec!["altitude"]);
        assert_eq!(config.top_countries, 5);
    }

    #[test]
    fn test_validation_empty_source() {
        let result = PrepConfig::builder("  ").build();
        assert!(matches!(result, Err(ConfigValidationError::EmptySource)));
    }

    #[test]
    fn test_validation_zero_top_countries() {
        let result = PrepConfig::builder("airports.dat").top_countries(0).build();
        assert!(matches!(
            result,
            Err(ConfigValidationError::InvalidTopCountries(0))
        ));
    }

    #[test]
    fn test_config_serialization() {
        let config = PrepConfig::builder("airports.dat")
            .fill_strategy(FillStrategy::Mode)
            .build()
            .unwrap();
        let json = serde_json::to_string(&config).unwrap();
        let back: PrepConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.fill_strategy, FillStrategy::Mode);
        assert_eq!(back.source, "airports.dat");
    }
}
