//! Logistic regression: the default binary classifier.
//!
//! A fitted [`LogisticModel`] is free of training hyperparameters; fitting
//! lives in [`LogisticTrainer`], which runs full-batch gradient descent on
//! the binary cross-entropy objective.

use crate::error::PipelineError;
use crate::frame::FeatureMatrix;
use crate::model::BinaryClassifier;
use crate::serialization::SerializableParams;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Numerically stable sigmoid.
fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

/// A fitted logistic regression model: `p = sigmoid(w^T x + b)`.
#[derive(Debug, Clone, PartialEq)]
pub struct LogisticModel {
    weights: Vec<f64>,
    bias: f64,
}

impl LogisticModel {
    pub fn new(weights: Vec<f64>, bias: f64) -> Self {
        Self { weights, bias }
    }

    /// Number of features the model expects per row.
    pub fn n_features(&self) -> usize {
        self.weights.len()
    }

    /// Raw logit `w^T x + b` for one feature row.
    pub fn decision_function(&self, features: &[f64]) -> f64 {
        self.weights
            .iter()
            .zip(features)
            .map(|(w, x)| w * x)
            .sum::<f64>()
            + self.bias
    }

    /// Predicted probability of the positive class.
    pub fn predict_proba(&self, features: &[f64]) -> f64 {
        sigmoid(self.decision_function(features))
    }

    /// Extract parameters for serialization.
    pub fn extract_params(&self) -> LogisticParams {
        LogisticParams {
            weights: self.weights.clone(),
            bias: self.bias,
        }
    }

    /// Reconstruct from parameters.
    pub fn from_params(params: LogisticParams) -> Self {
        Self {
            weights: params.weights,
            bias: params.bias,
        }
    }

    /// Save the model artifact to a file.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), PipelineError> {
        let bytes = self.extract_params().to_bytes()?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Load a model artifact from a file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, PipelineError> {
        let bytes = std::fs::read(path)?;
        let params = LogisticParams::from_bytes(&bytes)?;
        Ok(Self::from_params(params))
    }
}

impl BinaryClassifier for LogisticModel {
    /// Threshold the positive-class probability at 0.5.
    fn predict(&self, features: &[f64]) -> i64 {
        if self.predict_proba(features) >= 0.5 {
            1
        } else {
            0
        }
    }
}

/// Serializable parameters of a fitted [`LogisticModel`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticParams {
    pub weights: Vec<f64>,
    pub bias: f64,
}

/// Full-batch gradient-descent trainer for [`LogisticModel`].
///
/// Gradient of the BCE-with-logits objective: `(sigmoid(z) - y) / n` per
/// sample, accumulated over the batch each epoch.
#[derive(Debug, Clone)]
pub struct LogisticTrainer {
    learning_rate: f64,
    epochs: usize,
}

impl LogisticTrainer {
    pub fn new() -> Self {
        Self {
            learning_rate: 0.1,
            epochs: 500,
        }
    }

    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn with_epochs(mut self, epochs: usize) -> Self {
        self.epochs = epochs;
        self
    }

    /// Fit a model on a dense matrix and aligned 0/1 target vector.
    ///
    /// # Errors
    /// - [`PipelineError::EmptyData`] on an empty matrix.
    /// - [`PipelineError::Schema`] if the target length differs from the
    ///   row count.
    pub fn fit(
        &self,
        matrix: &FeatureMatrix,
        target: &[i64],
    ) -> Result<LogisticModel, PipelineError> {
        let (n_rows, n_features) = matrix.shape();
        if n_rows == 0 {
            return Err(PipelineError::EmptyData(
                "cannot fit a model on zero rows".to_string(),
            ));
        }
        if target.len() != n_rows {
            return Err(PipelineError::Schema(format!(
                "target vector has {} entries for {} rows",
                target.len(),
                n_rows
            )));
        }

        let mut weights = vec![0.0f64; n_features];
        let mut bias = 0.0f64;
        let scale = 1.0 / n_rows as f64;

        for _ in 0..self.epochs {
            let mut grad_w = vec![0.0f64; n_features];
            let mut grad_b = 0.0f64;

            for (row, &y) in matrix.rows().iter().zip(target) {
                let z = weights
                    .iter()
                    .zip(row)
                    .map(|(w, x)| w * x)
                    .sum::<f64>()
                    + bias;
                let err = (sigmoid(z) - y as f64) * scale;
                for (g, x) in grad_w.iter_mut().zip(row) {
                    *g += err * x;
                }
                grad_b += err;
            }

            for (w, g) in weights.iter_mut().zip(&grad_w) {
                *w -= self.learning_rate * g;
            }
            bias -= self.learning_rate * grad_b;
        }

        Ok(LogisticModel::new(weights, bias))
    }
}

impl Default for LogisticTrainer {
    fn default() -> Self {
        Self::new()
    }
}
