//! Batch inference over persisted artifacts.
//!
//! The service loads the registry and model once at startup and holds them
//! as read-only state for its lifetime. Every prediction call is `&self`;
//! nothing written at serving time can redefine the feature space the model
//! was trained on. To serve concurrent batches, share one service behind an
//! `Arc`; replacing artifacts means swapping in a whole new service, never
//! editing a loaded one.

use crate::error::PipelineError;
use crate::encoding::EncoderRegistry;
use crate::frame::RawFrame;
use crate::model::{BinaryClassifier, LogisticModel};
use crate::transform::{RecordTransformer, TransformerConfig};
use std::path::Path;

/// One admitted row's prediction, keyed by its index in the input batch.
#[derive(Debug, Clone, PartialEq)]
pub struct RowPrediction {
    pub index: usize,
    pub prediction: i64,
}

/// The response for one batch: predictions for every admitted row, plus the
/// count of rows excluded by admission filtering.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchPrediction {
    pub predictions: Vec<RowPrediction>,
    pub dropped_rows: usize,
}

/// Serves batch predictions against an immutable registry/model snapshot.
pub struct InferenceService<M: BinaryClassifier = LogisticModel> {
    transformer: RecordTransformer,
    registry: EncoderRegistry,
    model: M,
}

impl InferenceService<LogisticModel> {
    /// Load both artifacts from disk. A load failure here is fatal for the
    /// process and must be surfaced before any batch is accepted.
    pub fn load<P: AsRef<Path>, Q: AsRef<Path>>(
        config: TransformerConfig,
        registry_path: P,
        model_path: Q,
    ) -> Result<Self, PipelineError> {
        let registry = EncoderRegistry::load_from_file(registry_path)?;
        let model = LogisticModel::load_from_file(model_path)?;
        Ok(Self::new(config, registry, model))
    }
}

impl<M: BinaryClassifier> InferenceService<M> {
    /// Wire a service from already-loaded artifacts.
    pub fn new(config: TransformerConfig, registry: EncoderRegistry, model: M) -> Self {
        Self {
            transformer: RecordTransformer::new(config),
            registry,
            model,
        }
    }

    /// The registry snapshot this service predicts against.
    pub fn registry(&self) -> &EncoderRegistry {
        &self.registry
    }

    /// Predict one class label per admitted input row.
    ///
    /// The batch is validated first: every required column must be present,
    /// otherwise the whole batch is rejected with
    /// [`PipelineError::MissingColumns`] and zero rows are processed. A row
    /// failing numeric coercion is excluded and counted, never raised; an
    /// unseen categorical value encodes to the sentinel and flows through.
    pub fn predict_batch(&self, frame: &RawFrame) -> Result<BatchPrediction, PipelineError> {
        let mut missing: Vec<String> = self
            .transformer
            .config()
            .required_columns()
            .into_iter()
            .filter(|c| !frame.has_column(c))
            .collect();
        if !missing.is_empty() {
            missing.sort();
            return Err(PipelineError::MissingColumns(missing));
        }

        let out = self.transformer.transform(frame, &self.registry)?;
        let labels = self.model.predict_batch(&out.matrix);

        let predictions = out
            .admitted
            .iter()
            .zip(labels)
            .map(|(&index, prediction)| RowPrediction { index, prediction })
            .collect();

        Ok(BatchPrediction {
            predictions,
            dropped_rows: out.dropped_rows,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::FeatureMatrix;
    use crate::pipeline::train::TrainingPipeline;
    use crate::model::LogisticTrainer;
    use std::collections::BTreeMap;

    fn config() -> TransformerConfig {
        TransformerConfig {
            id_column: Some("customerID".to_string()),
            categorical_columns: vec!["Contract".to_string()],
            numeric_columns: vec!["tenure".to_string(), "TotalCharges".to_string()],
            target_column: "Churn".to_string(),
            target_mapping: BTreeMap::from([("Yes".to_string(), 1), ("No".to_string(), 0)]),
        }
    }

    fn train_row(id: &str, contract: &str, tenure: &str, charges: &str, churn: &str) -> Vec<String> {
        vec![
            id.to_string(),
            contract.to_string(),
            tenure.to_string(),
            charges.to_string(),
            churn.to_string(),
        ]
    }

    fn trained_service() -> InferenceService<LogisticModel> {
        let frame = RawFrame::new(
            ["customerID", "Contract", "tenure", "TotalCharges", "Churn"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            vec![
                train_row("c1", "Month-to-month", "1", "70.0", "Yes"),
                train_row("c2", "Month-to-month", "2", "150.0", "Yes"),
                train_row("c3", "Month-to-month", "3", "210.0", "Yes"),
                train_row("c4", "Two year", "48", "3400.0", "No"),
                train_row("c5", "Two year", "60", "4100.0", "No"),
                train_row("c6", "Two year", "72", "5000.0", "No"),
            ],
        )
        .unwrap();

        let pipeline = TrainingPipeline::new(
            config(),
            LogisticTrainer::new().with_learning_rate(0.3).with_epochs(3000),
        );
        let report = pipeline.run(&frame).unwrap();
        InferenceService::new(config(), report.registry, report.model)
    }

    fn serve_frame(rows: Vec<Vec<String>>) -> RawFrame {
        RawFrame::new(
            ["customerID", "Contract", "tenure", "TotalCharges"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            rows,
        )
        .unwrap()
    }

    fn serve_row(id: &str, contract: &str, tenure: &str, charges: &str) -> Vec<String> {
        vec![
            id.to_string(),
            contract.to_string(),
            tenure.to_string(),
            charges.to_string(),
        ]
    }

    #[test]
    fn test_predict_batch_indices_and_labels() {
        let service = trained_service();
        let batch = serve_frame(vec![
            serve_row("x1", "Month-to-month", "1", "70.0"),
            serve_row("x2", "Two year", "65", "4500.0"),
        ]);

        let result = service.predict_batch(&batch).unwrap();
        assert_eq!(result.dropped_rows, 0);
        assert_eq!(result.predictions.len(), 2);
        assert_eq!(result.predictions[0].index, 0);
        assert_eq!(result.predictions[0].prediction, 1);
        assert_eq!(result.predictions[1].index, 1);
        assert_eq!(result.predictions[1].prediction, 0);
    }

    #[test]
    fn test_predict_batch_missing_column_rejected() {
        // Scenario: batch missing "Contract" -> MissingColumns(["Contract"])
        let service = trained_service();
        let batch = RawFrame::new(
            ["customerID", "tenure", "TotalCharges"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            vec![vec!["x1".to_string(), "1".to_string(), "70.0".to_string()]],
        )
        .unwrap();

        let result = service.predict_batch(&batch);
        match result {
            Err(PipelineError::MissingColumns(cols)) => {
                assert_eq!(cols, vec!["Contract".to_string()]);
            }
            other => panic!("expected MissingColumns, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_predict_batch_missing_columns_sorted() {
        let service = trained_service();
        let batch = RawFrame::new(
            vec!["customerID".to_string()],
            vec![vec!["x1".to_string()]],
        )
        .unwrap();

        let result = service.predict_batch(&batch);
        match result {
            Err(PipelineError::MissingColumns(cols)) => {
                assert_eq!(
                    cols,
                    vec![
                        "Contract".to_string(),
                        "TotalCharges".to_string(),
                        "tenure".to_string()
                    ]
                );
            }
            other => panic!("expected MissingColumns, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_predict_batch_dropped_row_reported() {
        // Scenario: 3 rows, one "N/A" charge -> 2 predictions, 1 dropped
        let service = trained_service();
        let batch = serve_frame(vec![
            serve_row("x1", "Month-to-month", "1", "70.0"),
            serve_row("x2", "Two year", "50", "N/A"),
            serve_row("x3", "Two year", "66", "4700.0"),
        ]);

        let result = service.predict_batch(&batch).unwrap();
        assert_eq!(result.dropped_rows, 1);
        let indices: Vec<usize> = result.predictions.iter().map(|p| p.index).collect();
        assert_eq!(indices, vec![0, 2]);
    }

    #[test]
    fn test_predict_batch_unseen_value_does_not_fail() {
        let service = trained_service();
        let batch = serve_frame(vec![serve_row("x1", "Decade", "12", "900.0")]);

        let result = service.predict_batch(&batch).unwrap();
        assert_eq!(result.predictions.len(), 1);
        assert_eq!(result.dropped_rows, 0);
    }

    #[test]
    fn test_service_survives_bad_batch() {
        let service = trained_service();
        let bad = RawFrame::new(vec!["customerID".to_string()], vec![vec!["x".to_string()]]).unwrap();
        assert!(service.predict_batch(&bad).is_err());

        // Same service keeps answering afterwards
        let good = serve_frame(vec![serve_row("x1", "Two year", "70", "4800.0")]);
        let result = service.predict_batch(&good).unwrap();
        assert_eq!(result.predictions.len(), 1);
    }

    #[test]
    fn test_service_registry_unchanged_by_serving() {
        let service = trained_service();
        let before = service.registry().clone();

        let batch = serve_frame(vec![serve_row("x1", "Decade", "12", "900.0")]);
        service.predict_batch(&batch).unwrap();

        assert_eq!(service.registry(), &before);
    }

    #[test]
    fn test_service_load_from_saved_artifacts() {
        let tmp = tempfile::tempdir().unwrap();
        let registry_path = tmp.path().join("encoders.bin");
        let model_path = tmp.path().join("model.bin");

        let frame = RawFrame::new(
            ["customerID", "Contract", "tenure", "TotalCharges", "Churn"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            vec![
                train_row("c1", "Month-to-month", "1", "70.0", "Yes"),
                train_row("c2", "Two year", "60", "4100.0", "No"),
            ],
        )
        .unwrap();
        TrainingPipeline::new(config(), LogisticTrainer::new().with_epochs(200))
            .run_and_save(&frame, &registry_path, &model_path)
            .unwrap();

        let service = InferenceService::load(config(), &registry_path, &model_path).unwrap();
        let batch = serve_frame(vec![serve_row("x1", "Two year", "60", "4100.0")]);
        let result = service.predict_batch(&batch).unwrap();
        assert_eq!(result.predictions.len(), 1);
    }

    #[test]
    fn test_service_load_missing_artifact_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        let result = InferenceService::load(
            config(),
            tmp.path().join("missing-encoders.bin"),
            tmp.path().join("missing-model.bin"),
        );
        assert!(matches!(result, Err(PipelineError::IoError(_))));
    }

    #[test]
    fn test_service_with_custom_classifier() {
        struct MajorityNo;
        impl BinaryClassifier for MajorityNo {
            fn predict(&self, _features: &[f64]) -> i64 {
                0
            }
        }

        let trained = trained_service();
        let service = InferenceService::new(config(), trained.registry().clone(), MajorityNo);

        let batch = serve_frame(vec![serve_row("x1", "Month-to-month", "1", "70.0")]);
        let result = service.predict_batch(&batch).unwrap();
        assert_eq!(result.predictions[0].prediction, 0);

        // Trait object usage compiles against the same seam
        let matrix = FeatureMatrix::new(vec!["x".to_string()], vec![vec![1.0]]);
        let dyn_model: &dyn BinaryClassifier = &MajorityNo;
        assert_eq!(dyn_model.predict_batch(&matrix), vec![0]);
    }
}
