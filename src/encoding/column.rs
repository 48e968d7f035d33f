//! Label encoding for a single categorical column.
//!
//! Maps distinct string labels to integer codes (0, 1, 2, ...) in
//! first-seen order.

use crate::encoding::UNSEEN_CODE;
use crate::error::PipelineError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Label encoder for one categorical column.
///
/// Codes are assigned in **first-seen order** over the fit values, so the
/// mapping is deterministic whenever the input row order is. The encoder is
/// populated exactly once; encoding never mutates it, and an unknown value
/// encodes to the [`UNSEEN_CODE`] sentinel rather than failing.
///
/// # Example
/// ```
/// use churn_pipeline::encoding::{ColumnEncoder, UNSEEN_CODE};
///
/// let mut encoder = ColumnEncoder::new("InternetService");
/// encoder.fit(["DSL", "Fiber optic", "No"]).unwrap();
///
/// assert_eq!(encoder.encode("DSL"), 0);
/// assert_eq!(encoder.encode("Cable"), UNSEEN_CODE);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnEncoder {
    /// Name of the column this encoder was fit for. Immutable.
    column_name: String,
    /// Label -> code. Injective; codes are contiguous from 0.
    label_to_code: HashMap<String, i64>,
    /// Code -> label, index = code. Kept in lockstep with `label_to_code`.
    code_to_label: Vec<String>,
}

impl ColumnEncoder {
    /// Create an empty, unfitted encoder for the named column.
    pub fn new(column_name: impl Into<String>) -> Self {
        Self {
            column_name: column_name.into(),
            label_to_code: HashMap::new(),
            code_to_label: Vec::new(),
        }
    }

    /// The column this encoder belongs to.
    pub fn column_name(&self) -> &str {
        &self.column_name
    }

    /// Whether the encoder has been populated by a fit.
    pub fn is_fitted(&self) -> bool {
        !self.code_to_label.is_empty()
    }

    /// Number of distinct labels observed at fit time.
    pub fn n_labels(&self) -> usize {
        self.code_to_label.len()
    }

    /// The observed labels, ordered by code.
    pub fn labels(&self) -> &[String] {
        &self.code_to_label
    }

    /// Observe every distinct value in `values` and assign each a code in
    /// first-seen order.
    ///
    /// # Errors
    /// - [`PipelineError::Schema`] if the encoder is already fitted; the
    ///   mapping is established once per training run, never amended by a
    ///   later call.
    /// - [`PipelineError::EmptyData`] if `values` yields nothing.
    pub fn fit<I, S>(&mut self, values: I) -> Result<(), PipelineError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if self.is_fitted() {
            return Err(PipelineError::Schema(format!(
                "encoder for column '{}' is already fitted; re-fit requires a fresh encoder",
                self.column_name
            )));
        }

        for value in values {
            let value = value.as_ref();
            if !self.label_to_code.contains_key(value) {
                let code = self.code_to_label.len() as i64;
                self.label_to_code.insert(value.to_string(), code);
                self.code_to_label.push(value.to_string());
            }
        }

        if self.code_to_label.is_empty() {
            return Err(PipelineError::EmptyData(format!(
                "cannot fit encoder for column '{}' on zero values",
                self.column_name
            )));
        }

        Ok(())
    }

    /// Encode a value. Returns the assigned code for a known label and the
    /// [`UNSEEN_CODE`] sentinel otherwise. Total: never fails, never mutates.
    pub fn encode(&self, value: &str) -> i64 {
        self.label_to_code.get(value).copied().unwrap_or(UNSEEN_CODE)
    }

    /// Decode a code back to its label. Diagnostics only, not the hot path.
    ///
    /// # Errors
    /// Returns [`PipelineError::UnknownCode`] for the sentinel or any code
    /// that was never assigned.
    pub fn decode(&self, code: i64) -> Result<&str, PipelineError> {
        if code < 0 {
            return Err(PipelineError::UnknownCode {
                column: self.column_name.clone(),
                code,
            });
        }
        self.code_to_label
            .get(code as usize)
            .map(|s| s.as_str())
            .ok_or_else(|| PipelineError::UnknownCode {
                column: self.column_name.clone(),
                code,
            })
    }

    /// Extract parameters for serialization.
    pub fn extract_params(&self) -> ColumnEncoderParams {
        ColumnEncoderParams {
            column_name: self.column_name.clone(),
            labels: self.code_to_label.clone(),
        }
    }

    /// Reconstruct a fitted encoder from parameters.
    ///
    /// # Errors
    /// Returns [`PipelineError::Schema`] if the label table contains
    /// duplicates (the mapping would no longer be injective).
    pub fn from_params(params: ColumnEncoderParams) -> Result<Self, PipelineError> {
        let mut label_to_code = HashMap::with_capacity(params.labels.len());
        for (code, label) in params.labels.iter().enumerate() {
            if label_to_code.insert(label.clone(), code as i64).is_some() {
                return Err(PipelineError::Schema(format!(
                    "duplicate label '{}' in persisted table for column '{}'",
                    label, params.column_name
                )));
            }
        }

        Ok(Self {
            column_name: params.column_name,
            label_to_code,
            code_to_label: params.labels,
        })
    }
}

/// Serializable parameters for a fitted [`ColumnEncoder`].
///
/// The label table is an ordered list; a label's position is its code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnEncoderParams {
    pub column_name: String,
    pub labels: Vec<String>,
}
