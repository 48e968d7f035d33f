//! Classifier seam for the pipeline.
//!
//! The pipeline only requires a predict capability over dense feature rows;
//! training algorithms and hyperparameters live behind this trait. A
//! gradient-descent logistic regression ships as the default collaborator.

pub mod logistic;

pub use logistic::{LogisticModel, LogisticParams, LogisticTrainer};

use crate::frame::FeatureMatrix;

/// A binary classifier over dense feature rows.
///
/// Implementors map one feature row to a class label in `{0, 1}`. The row
/// layout must match the training-time feature-column order.
pub trait BinaryClassifier {
    /// Predict the class label for a single feature row.
    fn predict(&self, features: &[f64]) -> i64;

    /// Predict one label per matrix row.
    fn predict_batch(&self, matrix: &FeatureMatrix) -> Vec<i64> {
        matrix.rows().iter().map(|row| self.predict(row)).collect()
    }
}
