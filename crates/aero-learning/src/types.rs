//! Evaluation report types.

use serde::{Deserialize, Serialize};

/// Class labels for the IATA-availability problem, index-aligned with the
/// 0/1 target encoding.
pub const CLASS_LABELS: [&str; 2] = ["no_iata", "has_iata"];

/// Precision/recall/F1 for a single class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassMetrics {
    pub label: String,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    /// Number of true instances of this class in the evaluation split.
    pub support: usize,
}

/// 2x2 confusion matrix; `counts[actual][predicted]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    pub labels: [String; 2],
    pub counts: [[usize; 2]; 2],
}

impl ConfusionMatrix {
    pub fn new() -> Self {
        Self {
            labels: [CLASS_LABELS[0].to_string(), CLASS_LABELS[1].to_string()],
            counts: [[0, 0], [0, 0]],
        }
    }

    /// Record one (actual, predicted) observation. Labels outside {0, 1}
    /// are ignored.
    pub fn record(&mut self, actual: i32, predicted: i32) {
        if let (Some(a), Some(p)) = (Self::index(actual), Self::index(predicted)) {
            self.counts[a][p] += 1;
        }
    }

    fn index(label: i32) -> Option<usize> {
        match label {
            0 => Some(0),
            1 => Some(1),
            _ => None,
        }
    }

    pub fn get(&self, actual: i32, predicted: i32) -> usize {
        match (Self::index(actual), Self::index(predicted)) {
            (Some(a), Some(p)) => self.counts[a][p],
            _ => 0,
        }
    }

    pub fn total(&self) -> usize {
        self.counts.iter().flatten().sum()
    }

    pub fn correct(&self) -> usize {
        self.counts[0][0] + self.counts[1][1]
    }
}

impl Default for ConfusionMatrix {
    fn default() -> Self {
        Self::new()
    }
}

/// Full evaluation of a trained classifier on the held-out split.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub accuracy: f64,
    pub per_class: Vec<ClassMetrics>,
    pub confusion: ConfusionMatrix,
    /// Rows used for training / evaluation.
    pub train_size: usize,
    pub test_size: usize,
}

impl EvaluationReport {
    /// Serialize the report as pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Render the report as an aligned text table, one row per class.
    pub fn format_summary(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("Accuracy: {:.4}\n\n", self.accuracy));
        out.push_str(&format!(
            "{:<12} {:>10} {:>10} {:>10} {:>10}\n",
            "", "precision", "recall", "f1-score", "support"
        ));
        for metrics in &self.per_class {
            out.push_str(&format!(
                "{:<12} {:>10.2} {:>10.2} {:>10.2} {:>10}\n",
                metrics.label, metrics.precision, metrics.recall, metrics.f1, metrics.support
            ));
        }
        out
    }
}
