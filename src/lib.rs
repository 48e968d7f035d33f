//! # churn-pipeline
//!
//! A feature-encoding and prediction pipeline for customer churn data with
//! strict separation between the training and serving phases.
//!
//! ## Core Design Principles
//!
//! - **Fit Once, Serve Read-Only**: encoders learn their vocabulary during
//!   training and are frozen afterwards; the serving path can never grow or
//!   reorder the learned codes.
//! - **Total Encoding, Partial Decoding**: encoding an unseen category
//!   always succeeds and yields a sentinel code; decoding an unknown code is
//!   an error, because inventing a label would corrupt downstream reporting.
//! - **Pure Transforms**: every transformation consumes a borrowed frame and
//!   produces a new value. Input data is never mutated in place.
//! - **Explicit Schema Failures**: a batch missing required columns is
//!   rejected whole, with the missing names listed, before any row is
//!   touched.
//!
//! ## Quick Start
//!
//! ```no_run
//! use churn_pipeline::frame::RawFrame;
//! use churn_pipeline::model::LogisticTrainer;
//! use churn_pipeline::pipeline::{churn_config, InferenceService, TrainingPipeline};
//!
//! # fn main() -> Result<(), churn_pipeline::error::PipelineError> {
//! // Train from a labeled CSV and persist both artifacts.
//! let frame = RawFrame::from_csv_path("train.csv")?;
//! let pipeline = TrainingPipeline::new(churn_config(), LogisticTrainer::new());
//! pipeline.run_and_save(&frame, "encoders.bin", "model.bin")?;
//!
//! // Serve batches against the frozen artifacts.
//! let service = InferenceService::load(churn_config(), "encoders.bin", "model.bin")?;
//! let batch = RawFrame::from_csv_path("batch.csv")?;
//! let result = service.predict_batch(&batch)?;
//! for p in &result.predictions {
//!     println!("row {} -> {}", p.index, p.prediction);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Structure
//!
//! - `frame` — Raw string frames and dense feature matrices
//! - `encoding` — Per-column label encoders and the fitted registry
//! - `transform` — Record transformation (pruning, coercion, admission)
//! - `model` — The classifier seam and the default logistic regression
//! - `pipeline` — Training and serving orchestration
//! - `serialization` — Artifact persistence format
//! - `error` — The pipeline error taxonomy

/// The pipeline error taxonomy.
pub mod error;

/// Raw string frames and dense feature matrices.
pub mod frame;

/// Per-column label encoders and the fitted registry.
pub mod encoding;

/// Record transformation: pruning, numeric coercion, row admission.
pub mod transform;

/// Binary classifiers and the default logistic regression.
pub mod model;

/// Training and serving orchestration.
pub mod pipeline;

/// Artifact persistence format.
pub mod serialization;

pub use encoding::{ColumnEncoder, EncoderRegistry, UNSEEN_CODE};
pub use error::PipelineError;
pub use frame::{FeatureMatrix, RawFrame};
pub use pipeline::{InferenceService, TrainingPipeline};
pub use transform::{RecordTransformer, TransformerConfig};
