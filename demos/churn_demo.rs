//! Customer Churn Prediction Pipeline
//!
//! This example demonstrates the complete workflow on a small telco-style
//! dataset:
//! - Categorical label encoding with a frozen vocabulary
//! - Numeric coercion and row admission filtering
//! - Binary classification with logistic regression
//! - Artifact persistence and read-only serving
//!
//! Run with: cargo run --example churn_demo

use churn_pipeline::frame::RawFrame;
use churn_pipeline::model::LogisticTrainer;
use churn_pipeline::pipeline::{InferenceService, TrainingPipeline};
use churn_pipeline::transform::TransformerConfig;
use churn_pipeline::UNSEEN_CODE;
use std::collections::BTreeMap;
use std::error::Error;

/// A hand-sized slice of the telco churn schema. `TotalCharges` arrives as
/// text and occasionally holds junk, exactly like the real export.
fn get_training_data() -> Result<RawFrame, Box<dyn Error>> {
    let csv_data = "\
customerID,Contract,InternetService,tenure,TotalCharges,Churn
7590-VHVEG,Month-to-month,DSL,1,29.85,Yes
5575-GNVDE,Month-to-month,Fiber optic,2,153.20,Yes
3668-QPYBK,Month-to-month,Fiber optic,3,240.15,Yes
9237-HQITU,Month-to-month,Fiber optic,5,420.40,Yes
9305-CDSKC,Month-to-month,DSL,4,180.90,Yes
1452-KIOVK,Two year,DSL,48,2350.60,No
6713-OKOMC,Two year,No,55,1100.25,No
7892-POOKP,Two year,DSL,62,3050.80,No
6388-TABGU,Two year,No,70,1400.35,No
9763-GRSKD,Two year,DSL,72,3550.10,No
8091-TTVAX,One year,DSL,30,1450.55,No
0280-XJGEX,One year,Fiber optic,8,640.20,Yes
";
    Ok(RawFrame::from_csv_reader(csv_data.as_bytes())?)
}

fn get_serving_batch() -> Result<RawFrame, Box<dyn Error>> {
    // x3 has an unseen InternetService value; x4 has a blank TotalCharges
    let csv_data = "\
customerID,Contract,InternetService,tenure,TotalCharges
1111-AAAAA,Month-to-month,Fiber optic,2,160.00
2222-BBBBB,Two year,DSL,60,2900.00
3333-CCCCC,One year,Satellite,12,900.00
4444-DDDDD,Two year,No,50,
";
    Ok(RawFrame::from_csv_reader(csv_data.as_bytes())?)
}

fn demo_config() -> TransformerConfig {
    TransformerConfig {
        id_column: Some("customerID".to_string()),
        categorical_columns: vec!["Contract".to_string(), "InternetService".to_string()],
        numeric_columns: vec!["tenure".to_string(), "TotalCharges".to_string()],
        target_column: "Churn".to_string(),
        target_mapping: BTreeMap::from([("Yes".to_string(), 1), ("No".to_string(), 0)]),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    println!("=== Customer Churn Prediction Pipeline ===\n");

    // 1. Load training data
    let train = get_training_data()?;
    println!("Loaded {} labeled customers", train.n_rows());

    // 2. Fit encoders and model in one run
    let pipeline = TrainingPipeline::new(
        demo_config(),
        LogisticTrainer::new().with_learning_rate(0.3).with_epochs(3000),
    );
    let report = pipeline.run(&train)?;
    println!(
        "Trained on {} rows ({} dropped during admission)",
        report.rows_used, report.dropped_rows
    );

    // 3. Inspect the learned vocabularies
    for column in report.registry.encoded_columns() {
        if let Some(encoder) = report.registry.encoder(column) {
            println!("  {} -> {} distinct labels", column, encoder.n_labels());
        }
    }

    // 4. Persist both artifacts
    let dir = tempfile::tempdir()?;
    let registry_path = dir.path().join("encoders.bin");
    let model_path = dir.path().join("model.bin");
    report.registry.save_to_file(&registry_path)?;
    report.model.save_to_file(&model_path)?;
    println!("\nArtifacts saved to {}", dir.path().display());

    // 5. Load into a fresh serving process
    let service = InferenceService::load(demo_config(), &registry_path, &model_path)?;

    // 6. Predict a batch with an unseen category and a bad numeric cell
    let batch = get_serving_batch()?;
    println!("\nScoring batch of {} rows...", batch.n_rows());

    let net = service
        .registry()
        .encoder("InternetService")
        .ok_or("InternetService encoder missing")?;
    println!(
        "  'Satellite' encodes to {} (sentinel is {})",
        net.encode("Satellite"),
        UNSEEN_CODE
    );

    let result = service.predict_batch(&batch)?;
    println!(
        "  {} predictions, {} rows dropped",
        result.predictions.len(),
        result.dropped_rows
    );
    for p in &result.predictions {
        let id = batch.row(p.index).map(|r| r[0].clone()).unwrap_or_default();
        let label = if p.prediction == 1 { "churn" } else { "stay" };
        println!("  row {} ({}) -> {}", p.index, id, label);
    }

    Ok(())
}
