//! aero-learning: classifier training and diagnostics for airport data.
//!
//! This crate consumes the feature matrix and target produced by
//! `aero-processing` and provides the two collaborators of the
//! preparation pipeline:
//!
//! - **Trainer**: seeded stratified train/test split, random-forest fit
//!   (smartcore), and an evaluation report with accuracy, per-class
//!   precision/recall/F1, and a confusion matrix
//! - **Visualizer**: histograms, geographic scatter plots, top-N category
//!   bar charts, and the confusion-matrix heatmap, rendered with plotters
//!
//! Both components are stateless; the crate talks plain polars types so
//! it can also be used on its own.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use aero_learning::{Trainer, TrainerConfig, Visualizer};
//!
//! let config = TrainerConfig::builder()
//!     .test_fraction(0.25)
//!     .seed(42)
//!     .build()?;
//!
//! let report = Trainer::new(config)?.train_and_evaluate(&matrix, &target)?;
//! println!("{}", report.format_summary());
//!
//! let viz = Visualizer::new("plots");
//! let rendered = vec![
//!     viz.histogram(&df, "altitude", 30, None)?,
//!     viz.scatter_world(&df, "longitude", "latitude", Some("country"), Some(5000))?,
//!     viz.confusion_heatmap(&report.confusion)?,
//! ];
//! for plot in &rendered {
//!     println!("wrote {}", plot.path.display());
//! }
//! ```

pub mod config;
pub mod error;
pub mod model;
pub mod types;
pub mod visualize;

// Re-exports for convenient access
pub use config::{ConfigValidationError, TrainerConfig, TrainerConfigBuilder};
pub use error::{LearnError, Result as LearnResult};
pub use model::Trainer;
pub use types::{CLASS_LABELS, ClassMetrics, ConfusionMatrix, EvaluationReport};
pub use visualize::{
    DEFAULT_HISTOGRAM_BINS, DEFAULT_SCATTER_SAMPLE, PlotArtifact, SAMPLE_SEED, Visualizer,
};
