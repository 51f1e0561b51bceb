//! Random-forest training and evaluation.
//!
//! Consumes the feature matrix and target produced by the preparation
//! pipeline, performs a seeded stratified train/test split, fits a
//! random-forest classifier, and reports accuracy, per-class
//! precision/recall/F1, and the confusion matrix.

use crate::config::TrainerConfig;
use crate::error::{LearnError, Result};
use crate::types::{CLASS_LABELS, ClassMetrics, ConfusionMatrix, EvaluationReport};
use polars::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use smartcore::ensemble::random_forest_classifier::{
    RandomForestClassifier, RandomForestClassifierParameters,
};
use smartcore::linalg::basic::matrix::DenseMatrix;
use tracing::{debug, info};

/// Trains and evaluates the IATA-availability classifier.
pub struct Trainer {
    config: TrainerConfig,
}

impl Trainer {
    /// Create a trainer from a validated configuration.
    pub fn new(config: TrainerConfig) -> Result<Self> {
        config
            .validate()
            .map_err(|e| LearnError::InvalidArgument(e.to_string()))?;
        Ok(Self { config })
    }

    /// Split, fit, predict, and evaluate.
    ///
    /// `matrix` must contain only numeric columns without nulls; `target`
    /// must be an integer 0/1 column of the same length. The split is
    /// stratified: each class is shuffled and split at the configured
    /// test fraction, so class ratios carry over to both partitions.
    pub fn train_and_evaluate(&self, matrix: &DataFrame, target: &Series) -> Result<EvaluationReport> {
        let x = Self::to_rows(matrix)?;
        let y = Self::to_labels(target)?;

        if x.len() != y.len() {
            return Err(LearnError::InvalidArgument(format!(
                "feature matrix has {} rows but target has {}",
                x.len(),
                y.len()
            )));
        }
        if x.is_empty() {
            return Err(LearnError::EmptyInput(
                "cannot train on an empty feature matrix".to_string(),
            ));
        }

        let (train_idx, test_idx) = self.stratified_split(&y)?;
        debug!(
            "Stratified split: {} train rows, {} test rows",
            train_idx.len(),
            test_idx.len()
        );

        let gather_x = |idx: &[usize]| -> Vec<Vec<f64>> {
            idx.iter().map(|&i| x[i].clone()).collect()
        };
        let gather_y = |idx: &[usize]| -> Vec<i32> { idx.iter().map(|&i| y[i]).collect() };

        let x_train = DenseMatrix::from_2d_vec(&gather_x(&train_idx));
        let x_test = DenseMatrix::from_2d_vec(&gather_x(&test_idx));
        let y_train = gather_y(&train_idx);
        let y_test = gather_y(&test_idx);

        info!(
            "Fitting random forest: {} trees, {} features",
            self.config.n_trees,
            matrix.width()
        );
        let params = RandomForestClassifierParameters::default()
            .with_n_trees(self.config.n_trees)
            .with_seed(self.config.seed);
        let forest = RandomForestClassifier::fit(&x_train, &y_train, params)
            .map_err(|e| LearnError::TrainingFailed(e.to_string()))?;
        let predictions = forest
            .predict(&x_test)
            .map_err(|e| LearnError::TrainingFailed(e.to_string()))?;

        let report = Self::evaluate(&y_test, &predictions, train_idx.len());
        info!("Evaluation accuracy: {:.4}", report.accuracy);
        Ok(report)
    }

    /// Flatten the matrix into row-major f64 vectors.
    fn to_rows(matrix: &DataFrame) -> Result<Vec<Vec<f64>>> {
        if matrix.width() == 0 {
            return Err(LearnError::EmptyInput(
                "feature matrix has no columns".to_string(),
            ));
        }
        let mut columns: Vec<Vec<f64>> = Vec::with_capacity(matrix.width());
        for column in matrix.get_columns() {
            let series = column
                .as_materialized_series()
                .cast(&DataType::Float64)
                .map_err(|_| {
                    LearnError::InvalidArgument(format!(
                        "feature column '{}' is not numeric",
                        column.name()
                    ))
                })?;
            let ca = series.f64()?;
            if ca.null_count() > 0 {
                return Err(LearnError::InvalidArgument(format!(
                    "feature column '{}' contains missing values",
                    column.name()
                )));
            }
            columns.push(ca.into_iter().flatten().collect());
        }
        let height = matrix.height();
        let mut rows = Vec::with_capacity(height);
        for i in 0..height {
            rows.push(columns.iter().map(|col| col[i]).collect());
        }
        Ok(rows)
    }

    fn to_labels(target: &Series) -> Result<Vec<i32>> {
        let series = target.cast(&DataType::Int32)?;
        let ca = series.i32()?;
        if ca.null_count() > 0 {
            return Err(LearnError::InvalidArgument(
                "target contains missing values".to_string(),
            ));
        }
        Ok(ca.into_iter().flatten().collect())
    }

    /// Per-class shuffled split at the configured test fraction. Each
    /// class needs at least two members so both partitions see it.
    fn stratified_split(&self, y: &[i32]) -> Result<(Vec<usize>, Vec<usize>)> {
        let mut classes: Vec<i32> = y.to_vec();
        classes.sort_unstable();
        classes.dedup();
        if classes.len() < 2 {
            return Err(LearnError::EmptyInput(
                "stratified split requires both target classes to be present".to_string(),
            ));
        }

        let mut rng = StdRng::seed_from_u64(self.config.seed);
        let mut train_idx = Vec::new();
        let mut test_idx = Vec::new();

        for class in classes {
            let mut members: Vec<usize> = y
                .iter()
                .enumerate()
                .filter(|(_, label)| **label == class)
                .map(|(i, _)| i)
                .collect();
            if members.len() < 2 {
                return Err(LearnError::EmptyInput(format!(
                    "class {class} has fewer than 2 samples; cannot stratify"
                )));
            }
            members.shuffle(&mut rng);
            let n_test = ((members.len() as f64) * self.config.test_fraction).round() as usize;
            let n_test = n_test.clamp(1, members.len() - 1);
            test_idx.extend_from_slice(&members[..n_test]);
            train_idx.extend_from_slice(&members[n_test..]);
        }

        // deterministic row order within each partition
        train_idx.sort_unstable();
        test_idx.sort_unstable();
        Ok((train_idx, test_idx))
    }

    /// Accuracy, per-class precision/recall/F1, and the confusion matrix.
    fn evaluate(y_true: &[i32], y_pred: &[i32], train_size: usize) -> EvaluationReport {
        let mut confusion = ConfusionMatrix::new();
        for (&actual, &predicted) in y_true.iter().zip(y_pred.iter()) {
            confusion.record(actual, predicted);
        }

        let total = confusion.total();
        let accuracy = if total == 0 {
            0.0
        } else {
            confusion.correct() as f64 / total as f64
        };

        let per_class = (0..2)
            .map(|class| {
                let tp = confusion.counts[class][class];
                let fp = confusion.counts[1 - class][class];
                let fn_ = confusion.counts[class][1 - class];
                let support = confusion.counts[class][0] + confusion.counts[class][1];

                let precision = ratio(tp, tp + fp);
                let recall = ratio(tp, tp + fn_);
                let f1 = if precision + recall == 0.0 {
                    0.0
                } else {
                    2.0 * precision * recall / (precision + recall)
                };

                ClassMetrics {
                    label: CLASS_LABELS[class].to_string(),
                    precision,
                    recall,
                    f1,
                    support,
                }
            })
            .collect();

        EvaluationReport {
            accuracy,
            per_class,
            confusion,
            train_size,
            test_size: y_true.len(),
        }
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

static_assertions::assert_impl_all!(Trainer: Send, Sync);
