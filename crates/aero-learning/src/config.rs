//! Configuration for the trainer.

use serde::{Deserialize, Serialize};

/// Configuration for [`crate::model::Trainer`].
///
/// Use [`TrainerConfig::builder()`] for fluent construction with
/// validation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TrainerConfig {
    /// Fraction of rows held out for evaluation, per class.
    /// Default: 0.25
    pub test_fraction: f64,

    /// Seed for the stratified split shuffle and the forest.
    /// Default: 42
    pub seed: u64,

    /// Number of trees in the forest.
    /// Default: 100
    pub n_trees: u16,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            test_fraction: 0.25,
            seed: 42,
            n_trees: 100,
        }
    }
}

impl TrainerConfig {
    /// Create a new configuration builder.
    pub fn builder() -> TrainerConfigBuilder {
        TrainerConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if !(self.test_fraction > 0.0 && self.test_fraction < 1.0) {
            return Err(ConfigValidationError::InvalidTestFraction(
                self.test_fraction,
            ));
        }
        if self.n_trees == 0 {
            return Err(ConfigValidationError::InvalidTreeCount(self.n_trees));
        }
        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid test_fraction: {0} (must be strictly between 0 and 1)")]
    InvalidTestFraction(f64),

    #[error("Invalid n_trees: {0} (must be at least 1)")]
    InvalidTreeCount(u16),
}

/// Builder for [`TrainerConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct TrainerConfigBuilder {
    test_fraction: Option<f64>,
    seed: Option<u64>,
    n_trees: Option<u16>,
}

impl TrainerConfigBuilder {
    /// Set the held-out test fraction (strictly between 0 and 1).
    pub fn test_fraction(mut self, fraction: f64) -> Self {
        self.test_fraction = Some(fraction);
        self
    }

    /// Set the seed used for the split shuffle and the forest.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the number of trees in the forest.
    pub fn n_trees(mut self, n: u16) -> Self {
        self.n_trees = Some(n);
        self
    }

    /// Build the configuration.
    pub fn build(self) -> Result<TrainerConfig, ConfigValidationError> {
        let defaults = TrainerConfig::default();
        let config = TrainerConfig {
            test_fraction: self.test_fraction.unwrap_or(defaults.test_fraction),
            seed: self.seed.unwrap_or(defaults.seed),
            n_trees: self.n_trees.unwrap_or(defaults.n_trees),
        };
        config.validate()?;
        Ok(config)
    }
}
