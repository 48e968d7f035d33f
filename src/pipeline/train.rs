//! Training entry point: fit the registry and the model, persist both.

use crate::error::PipelineError;
use crate::encoding::EncoderRegistry;
use crate::frame::RawFrame;
use crate::model::{LogisticModel, LogisticTrainer};
use crate::transform::{RecordTransformer, TransformerConfig};
use std::path::Path;

/// Result of one training run: both fitted artifacts plus admission
/// accounting for the training data.
pub struct TrainingReport {
    pub registry: EncoderRegistry,
    pub model: LogisticModel,
    /// Rows that entered model fitting.
    pub rows_used: usize,
    /// Rows excluded by admission filtering.
    pub dropped_rows: usize,
}

/// Fits an [`EncoderRegistry`] and a [`LogisticModel`] from a labeled
/// frame. All paths are explicit parameters; nothing is read from the
/// process environment.
pub struct TrainingPipeline {
    transformer: RecordTransformer,
    trainer: LogisticTrainer,
}

impl TrainingPipeline {
    pub fn new(config: TransformerConfig, trainer: LogisticTrainer) -> Self {
        Self {
            transformer: RecordTransformer::new(config),
            trainer,
        }
    }

    /// Fit both artifacts from a labeled training frame.
    pub fn run(&self, frame: &RawFrame) -> Result<TrainingReport, PipelineError> {
        let fit = self.transformer.fit_transform(frame)?;
        let model = self.trainer.fit(&fit.matrix, &fit.target)?;

        Ok(TrainingReport {
            registry: fit.registry,
            model,
            rows_used: fit.matrix.n_rows(),
            dropped_rows: fit.dropped_rows,
        })
    }

    /// Fit both artifacts and persist them at the given paths. Persistence
    /// is a bounded, synchronous step at the end of the run, not
    /// interleaved with transformation.
    pub fn run_and_save<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        frame: &RawFrame,
        registry_path: P,
        model_path: Q,
    ) -> Result<TrainingReport, PipelineError> {
        let report = self.run(frame)?;
        report.registry.save_to_file(registry_path)?;
        report.model.save_to_file(model_path)?;
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BinaryClassifier;
    use crate::transform::TransformerConfig;
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

    fn row(id: &str, contract: &str, tenure: &str, charges: &str, churn: &str) -> Vec<String> {
        vec![
            id.to_string(),
            contract.to_string(),
            tenure.to_string(),
            charges.to_string(),
            churn.to_string(),
        ]
    }

    fn training_frame() -> RawFrame {
        // Short-tenure month-to-month customers churn; long-tenure two-year
        // customers stay.
        RawFrame::new(
            ["customerID", "Contract", "tenure", "TotalCharges", "Churn"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            vec![
                row("c1", "Month-to-month", "1", "70.0", "Yes"),
                row("c2", "Month-to-month", "2", "150.0", "Yes"),
                row("c3", "Month-to-month", "3", "210.0", "Yes"),
                row("c4", "Two year", "48", "3400.0", "No"),
                row("c5", "Two year", "60", "4100.0", "No"),
                row("c6", "Two year", "72", "5000.0", "No"),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_training_run_produces_both_artifacts() {
        let pipeline = TrainingPipeline::new(config(), LogisticTrainer::new().with_epochs(300));
        let report = pipeline.run(&training_frame()).unwrap();

        assert!(report.registry.is_fitted());
        assert_eq!(report.rows_used, 6);
        assert_eq!(report.dropped_rows, 0);
        assert_eq!(report.model.n_features(), 3); // Contract, tenure, TotalCharges
    }

    #[test]
    fn test_training_counts_dropped_rows() {
        let mut rows = vec![
            row("c1", "Month-to-month", "1", "70.0", "Yes"),
            row("c2", "Two year", "48", "not-a-number", "No"),
            row("c3", "Two year", "60", "4100.0", "No"),
        ];
        let frame = RawFrame::new(
            ["customerID", "Contract", "tenure", "TotalCharges", "Churn"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            std::mem::take(&mut rows),
        )
        .unwrap();

        let pipeline = TrainingPipeline::new(config(), LogisticTrainer::new().with_epochs(50));
        let report = pipeline.run(&frame).unwrap();

        assert_eq!(report.rows_used, 2);
        assert_eq!(report.dropped_rows, 1);
    }

    #[test]
    fn test_run_and_save_artifacts_loadable() {
        let tmp = tempfile::tempdir().unwrap();
        let registry_path = tmp.path().join("encoders.bin");
        let model_path = tmp.path().join("model.bin");

        let pipeline = TrainingPipeline::new(
            config(),
            LogisticTrainer::new().with_learning_rate(0.3).with_epochs(2000),
        );
        let report = pipeline
            .run_and_save(&training_frame(), &registry_path, &model_path)
            .unwrap();

        let registry = EncoderRegistry::load_from_file(&registry_path).unwrap();
        let model = LogisticModel::load_from_file(&model_path).unwrap();

        assert_eq!(registry, report.registry);
        assert_eq!(model, report.model);

        // Loaded artifacts reproduce the in-process predictions
        let transformer = RecordTransformer::new(config());
        let out = transformer.transform(&training_frame(), &registry).unwrap();
        assert_eq!(
            model.predict_batch(&out.matrix),
            report.model.predict_batch(&out.matrix)
        );
    }

    #[test]
    fn test_training_missing_target_fails() {
        let frame = training_frame().without_columns(&["Churn"]);
        let pipeline = TrainingPipeline::new(config(), LogisticTrainer::new());
        let result = pipeline.run(&frame);
        assert!(matches!(result, Err(PipelineError::Schema(_))));
    }
}
