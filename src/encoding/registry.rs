//! Registry of fitted column encoders.
//!
//! The registry is the persisted consistency artifact of the pipeline: it
//! carries one [`ColumnEncoder`] per categorical column, the target-label
//! mapping, and the feature-column order established at training time.
//! Serving reconstructs an identical registry from the artifact and applies
//! it read-only; the set of encoded columns never grows at serving time.

use crate::encoding::column::{ColumnEncoder, ColumnEncoderParams};
use crate::error::PipelineError;
use crate::frame::{FeatureMatrix, RawFrame};
use crate::serialization::SerializableParams;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// One encoder per categorical column, plus the target mapping and the
/// fitted feature schema.
///
/// Lifecycle: created once with the target mapping, populated by a single
/// [`fit_all`](Self::fit_all) over the training data, then serialized.
/// Serving deserializes it and only ever calls `&self` methods; registry
/// evolution happens through an explicit re-training run that produces a
/// fresh registry, never by amending a loaded one.
#[derive(Debug, Clone, PartialEq)]
pub struct EncoderRegistry {
    /// Column name -> fitted encoder. Keys are exactly the categorical
    /// schema established at training time.
    encoders: BTreeMap<String, ColumnEncoder>,
    /// Feature columns in training-time order (target excluded). This is
    /// the column order of every matrix the registry produces.
    feature_columns: Vec<String>,
    /// Name of the label column. Mapped through `target_mapping`, not
    /// column-encoded like the features.
    target_column: String,
    /// Fixed label -> class mapping, e.g. {"Yes": 1, "No": 0}.
    target_mapping: BTreeMap<String, i64>,
}

impl EncoderRegistry {
    /// Create an unfitted registry with the given target column and mapping.
    pub fn new(
        target_column: impl Into<String>,
        target_mapping: BTreeMap<String, i64>,
    ) -> Self {
        Self {
            encoders: BTreeMap::new(),
            feature_columns: Vec::new(),
            target_column: target_column.into(),
            target_mapping,
        }
    }

    /// Whether the registry has been populated by [`fit_all`](Self::fit_all).
    pub fn is_fitted(&self) -> bool {
        !self.feature_columns.is_empty()
    }

    /// The fitted encoder for a column, if one exists.
    pub fn encoder(&self, column: &str) -> Option<&ColumnEncoder> {
        self.encoders.get(column)
    }

    /// Names of the categorical columns with fitted encoders.
    pub fn encoded_columns(&self) -> impl Iterator<Item = &str> {
        self.encoders.keys().map(|k| k.as_str())
    }

    /// Feature columns in training-time order.
    pub fn feature_columns(&self) -> &[String] {
        &self.feature_columns
    }

    /// Name of the target column.
    pub fn target_column(&self) -> &str {
        &self.target_column
    }

    /// The fixed target-label mapping.
    pub fn target_mapping(&self) -> &BTreeMap<String, i64> {
        &self.target_mapping
    }

    /// Map one target label through the target mapping.
    pub fn map_target(&self, label: &str) -> Option<i64> {
        self.target_mapping.get(label).copied()
    }

    /// Fit a fresh encoder over each declared categorical column of `frame`
    /// and record the frame's column order (minus the target) as the feature
    /// schema. Deterministic given deterministic row order.
    ///
    /// # Errors
    /// - [`PipelineError::Schema`] if the registry is already fitted or a
    ///   declared categorical column is absent from the frame.
    /// - [`PipelineError::EmptyData`] if the frame has no rows.
    pub fn fit_all(
        &mut self,
        frame: &RawFrame,
        categorical_columns: &[String],
    ) -> Result<(), PipelineError> {
        if self.is_fitted() {
            return Err(PipelineError::Schema(
                "registry is already fitted; re-fit requires a fresh registry".to_string(),
            ));
        }
        if frame.is_empty() {
            return Err(PipelineError::EmptyData(
                "cannot fit registry on a frame with no rows".to_string(),
            ));
        }

        let mut encoders = BTreeMap::new();
        for column in categorical_columns {
            let values = frame.column_values(column).map_err(|_| {
                PipelineError::Schema(format!(
                    "categorical column '{}' absent from training data",
                    column
                ))
            })?;
            let mut encoder = ColumnEncoder::new(column.clone());
            encoder.fit(values)?;
            encoders.insert(column.clone(), encoder);
        }

        self.encoders = encoders;
        self.feature_columns = frame
            .columns()
            .iter()
            .filter(|c| **c != self.target_column)
            .cloned()
            .collect();

        Ok(())
    }

    /// Transform a frame into a numeric matrix in the fitted column order.
    ///
    /// For every feature column: an encoded column yields its code (unseen
    /// value -> sentinel), any other column is parsed as `f64` (parse
    /// failure -> NaN, to be filtered by the caller's admission step).
    /// Columns of `frame` outside the fitted schema are ignored; the target
    /// column, if present, is excluded.
    ///
    /// # Errors
    /// Returns [`PipelineError::Schema`] if the registry is unfitted or a
    /// fitted feature column is absent from `frame`.
    pub fn transform_all(&self, frame: &RawFrame) -> Result<FeatureMatrix, PipelineError> {
        if !self.is_fitted() {
            return Err(PipelineError::Schema(
                "registry is not fitted; transform requires a fitted registry".to_string(),
            ));
        }

        let mut indices = Vec::with_capacity(self.feature_columns.len());
        for column in &self.feature_columns {
            let idx = frame.column_index(column).ok_or_else(|| {
                PipelineError::Schema(format!(
                    "column '{}' was present at fit time but is absent from the input",
                    column
                ))
            })?;
            indices.push(idx);
        }

        let mut rows = Vec::with_capacity(frame.n_rows());
        for row_idx in 0..frame.n_rows() {
            let Some(row) = frame.row(row_idx) else {
                break;
            };
            let mut out = Vec::with_capacity(indices.len());
            for (column, &cell_idx) in self.feature_columns.iter().zip(&indices) {
                let cell = row[cell_idx].as_str();
                let value = match self.encoders.get(column) {
                    Some(encoder) => encoder.encode(cell) as f64,
                    None => cell.trim().parse::<f64>().unwrap_or(f64::NAN),
                };
                out.push(value);
            }
            rows.push(out);
        }

        Ok(FeatureMatrix::new(self.feature_columns.clone(), rows))
    }

    /// Extract parameters for serialization.
    pub fn extract_params(&self) -> EncoderRegistryParams {
        EncoderRegistryParams {
            encoders: self.encoders.values().map(|e| e.extract_params()).collect(),
            feature_columns: self.feature_columns.clone(),
            target_column: self.target_column.clone(),
            target_mapping: self
                .target_mapping
                .iter()
                .map(|(k, v)| (k.clone(), *v))
                .collect(),
        }
    }

    /// Reconstruct an identical registry from parameters.
    ///
    /// # Errors
    /// Returns [`PipelineError::Schema`] if an encoder's column is not part
    /// of the persisted feature schema or a label table is corrupt.
    pub fn from_params(params: EncoderRegistryParams) -> Result<Self, PipelineError> {
        let mut encoders = BTreeMap::new();
        for encoder_params in params.encoders {
            let encoder = ColumnEncoder::from_params(encoder_params)?;
            if !params
                .feature_columns
                .iter()
                .any(|c| c == encoder.column_name())
            {
                return Err(PipelineError::Schema(format!(
                    "persisted encoder for '{}' is outside the feature schema",
                    encoder.column_name()
                )));
            }
            encoders.insert(encoder.column_name().to_string(), encoder);
        }

        Ok(Self {
            encoders,
            feature_columns: params.feature_columns,
            target_column: params.target_column,
            target_mapping: params.target_mapping.into_iter().collect(),
        })
    }

    /// Save the registry artifact to a file.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), PipelineError> {
        let bytes = self.extract_params().to_bytes()?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Load a registry artifact from a file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, PipelineError> {
        let bytes = std::fs::read(path)?;
        let params = EncoderRegistryParams::from_bytes(&bytes)?;
        Self::from_params(params)
    }
}

/// Serializable parameters for a fitted [`EncoderRegistry`].
///
/// Each encoder is an ordered label table (position = code); the mapping is
/// stored as pairs for a stable, process-independent layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncoderRegistryParams {
    pub encoders: Vec<ColumnEncoderParams>,
    pub feature_columns: Vec<String>,
    pub target_column: String,
    pub target_mapping: Vec<(String, i64)>,
}
