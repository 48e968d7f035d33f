//! Record transformation: from raw tabular batches to dense feature matrices.
//!
//! [`RecordTransformer`] orchestrates the fixed step order shared by the
//! training and serving paths:
//!
//! 1. drop the identifier column and every column outside the declared
//!    schema (no-op if absent);
//! 2. coerce every declared numeric column (parse failures become missing);
//! 3. drop rows containing any missing value — admission filtering, counted,
//!    never imputed, so the output matrix is fully dense;
//! 4. delegate categorical columns to the [`EncoderRegistry`]
//!    (`fit_all` when training, `transform_all` when serving);
//! 5. map the target column when present; omit it otherwise.
//!
//! Transformation is a pure function over a borrowed frame: caller-owned
//! data is never mutated, and a serving-time transform never mutates the
//! registry.

use crate::encoding::EncoderRegistry;
use crate::error::PipelineError;
use crate::frame::{FeatureMatrix, RawFrame};
use std::collections::BTreeMap;

/// Explicit column schema for a [`RecordTransformer`].
///
/// The column set is fixed and known up front; there is no dtype sniffing
/// and no configuration pulled from the process environment.
#[derive(Debug, Clone)]
pub struct TransformerConfig {
    /// Identifier column with no predictive signal, dropped when present.
    pub id_column: Option<String>,
    /// Columns encoded through the registry.
    pub categorical_columns: Vec<String>,
    /// Columns coerced to `f64`. Includes numeric-but-textual fields.
    pub numeric_columns: Vec<String>,
    /// Name of the label column.
    pub target_column: String,
    /// Fixed label -> class mapping for the target column.
    pub target_mapping: BTreeMap<String, i64>,
}

impl TransformerConfig {
    /// Every column a batch must carry (categorical + numeric, in that
    /// order; id and target are not required of serving input).
    pub fn required_columns(&self) -> Vec<String> {
        self.categorical_columns
            .iter()
            .chain(self.numeric_columns.iter())
            .cloned()
            .collect()
    }
}

/// Output of the training-path transformation.
#[derive(Debug)]
pub struct FitOutput {
    /// Dense feature matrix over the admitted rows.
    pub matrix: FeatureMatrix,
    /// Mapped target classes, aligned with `matrix` rows.
    pub target: Vec<i64>,
    /// The freshly fitted registry.
    pub registry: EncoderRegistry,
    /// Rows excluded by admission filtering.
    pub dropped_rows: usize,
}

/// Output of the serving-path transformation.
#[derive(Debug)]
pub struct TransformOutput {
    /// Dense feature matrix over the admitted rows.
    pub matrix: FeatureMatrix,
    /// Original input indices of the admitted rows, aligned with `matrix`.
    pub admitted: Vec<usize>,
    /// Rows excluded by admission filtering.
    pub dropped_rows: usize,
}

/// Orchestrates column pruning, coercion, admission filtering, encoder
/// delegation and target mapping.
#[derive(Debug, Clone)]
pub struct RecordTransformer {
    config: TransformerConfig,
}

impl RecordTransformer {
    pub fn new(config: TransformerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TransformerConfig {
        &self.config
    }

    /// Training path: prune, coerce, filter, fit a fresh registry, encode,
    /// map the target.
    ///
    /// # Errors
    /// - [`PipelineError::Schema`] if a required column or the target column
    ///   is absent from the training data.
    /// - [`PipelineError::EmptyData`] if no row survives admission.
    pub fn fit_transform(&self, frame: &RawFrame) -> Result<FitOutput, PipelineError> {
        for column in self.config.required_columns() {
            if !frame.has_column(&column) {
                return Err(PipelineError::Schema(format!(
                    "required column '{}' absent from training data",
                    column
                )));
            }
        }
        if !frame.has_column(&self.config.target_column) {
            return Err(PipelineError::Schema(format!(
                "target column '{}' absent from training data",
                self.config.target_column
            )));
        }

        let pruned = self.prune(frame, true);
        let target_values = pruned.column_values(&self.config.target_column)?;
        let mapped_target: Vec<Option<i64>> = target_values
            .iter()
            .map(|v| self.config.target_mapping.get(*v).copied())
            .collect();

        // Admission: numeric coercion failures and unmapped target labels
        // both exclude the row.
        let numeric_ok = self.coercible_rows(&pruned)?;
        let admitted: Vec<usize> = (0..pruned.n_rows())
            .filter(|&i| numeric_ok[i] && mapped_target[i].is_some())
            .collect();
        let dropped_rows = pruned.n_rows() - admitted.len();

        if admitted.is_empty() {
            return Err(PipelineError::EmptyData(
                "no training rows survived admission filtering".to_string(),
            ));
        }

        let clean = pruned.select_rows(&admitted);
        let mut registry = EncoderRegistry::new(
            self.config.target_column.clone(),
            self.config.target_mapping.clone(),
        );
        registry.fit_all(&clean, &self.config.categorical_columns)?;

        let matrix = registry.transform_all(&clean)?;
        // Admission already required a mapped target for every kept row
        let target: Vec<i64> = admitted
            .iter()
            .filter_map(|&i| mapped_target[i])
            .collect();

        Ok(FitOutput {
            matrix,
            target,
            registry,
            dropped_rows,
        })
    }

    /// Serving path: prune, coerce, filter, apply the fitted registry.
    /// The target column, if present, is ignored. The registry is read-only;
    /// a configured categorical column without an encoder is a schema error,
    /// never an implicit serving-time fit.
    pub fn transform(
        &self,
        frame: &RawFrame,
        registry: &EncoderRegistry,
    ) -> Result<TransformOutput, PipelineError> {
        if !registry.is_fitted() {
            return Err(PipelineError::Schema(
                "registry is not fitted; run the training pipeline first".to_string(),
            ));
        }
        for column in &self.config.categorical_columns {
            if registry.encoder(column).is_none() {
                return Err(PipelineError::Schema(format!(
                    "no encoder for categorical column '{}'; registry evolution \
                     requires an explicit re-training run",
                    column
                )));
            }
        }

        let pruned = self.prune(frame, false);
        let numeric_ok = self.coercible_rows(&pruned)?;
        let admitted: Vec<usize> = (0..pruned.n_rows()).filter(|&i| numeric_ok[i]).collect();
        let dropped_rows = pruned.n_rows() - admitted.len();

        let clean = pruned.select_rows(&admitted);
        let matrix = registry.transform_all(&clean)?;

        Ok(TransformOutput {
            matrix,
            admitted,
            dropped_rows,
        })
    }

    /// Step 1: keep only the declared schema. The id column, a stray
    /// target column at serving time, and any column outside the declared
    /// categorical/numeric set are all shed here; an undeclared column
    /// would otherwise reach the registry, parse as NaN and break the
    /// dense-matrix contract without being counted.
    fn prune(&self, frame: &RawFrame, keep_target: bool) -> RawFrame {
        let declared = |column: &str| {
            self.config.categorical_columns.iter().any(|c| c == column)
                || self.config.numeric_columns.iter().any(|c| c == column)
                || (keep_target && column == self.config.target_column)
        };
        let drop: Vec<&str> = frame
            .columns()
            .iter()
            .map(|c| c.as_str())
            .filter(|c| !declared(c))
            .collect();
        frame.without_columns(&drop)
    }

    /// Step 2/3 support: per-row flag, true when every declared numeric
    /// column holds a finite number.
    fn coercible_rows(&self, frame: &RawFrame) -> Result<Vec<bool>, PipelineError> {
        let mut ok = vec![true; frame.n_rows()];
        for column in &self.config.numeric_columns {
            let values = frame.column_values(column).map_err(|_| {
                PipelineError::Schema(format!("numeric column '{}' absent from input", column))
            })?;
            for (i, value) in values.iter().enumerate() {
                if !matches!(value.trim().parse::<f64>(), Ok(v) if v.is_finite()) {
                    ok[i] = false;
                }
            }
        }
        Ok(ok)
    }
}
