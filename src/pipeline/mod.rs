//! Training and serving orchestration.
//!
//! - [`TrainingPipeline`]: fits the encoder registry and a model from a
//!   labeled frame and persists both artifacts.
//! - [`InferenceService`]: loads the artifacts once and serves batch
//!   predictions against an immutable registry snapshot.

pub mod serve;
pub mod train;

pub use serve::{BatchPrediction, InferenceService, RowPrediction};
pub use train::{TrainingPipeline, TrainingReport};

use crate::transform::TransformerConfig;
use std::collections::BTreeMap;

/// The fixed telco churn schema: `customerID` identifier, fifteen
/// categorical service/contract/billing attributes, four numeric
/// tenure/charges fields (`TotalCharges` arrives as text), and the
/// `Churn` target mapped `{Yes: 1, No: 0}`.
pub fn churn_config() -> TransformerConfig {
    let categorical = [
        "gender",
        "Partner",
        "Dependents",
        "PhoneService",
        "MultipleLines",
        "InternetService",
        "OnlineSecurity",
        "OnlineBackup",
        "DeviceProtection",
        "TechSupport",
        "StreamingTV",
        "StreamingMovies",
        "Contract",
        "PaperlessBilling",
        "PaymentMethod",
    ];
    let numeric = ["SeniorCitizen", "tenure", "MonthlyCharges", "TotalCharges"];

    TransformerConfig {
        id_column: Some("customerID".to_string()),
        categorical_columns: categorical.iter().map(|s| s.to_string()).collect(),
        numeric_columns: numeric.iter().map(|s| s.to_string()).collect(),
        target_column: "Churn".to_string(),
        target_mapping: BTreeMap::from([("Yes".to_string(), 1), ("No".to_string(), 0)]),
    }
}
