//! Fit the classifier model from labeled rows.

use std::path::PathBuf;

use tonecheck_analysis::classifier::NaiveBayesModel;
use tonecheck_common::config::AppConfig;
use tonecheck_model::dataset::Dataset;

pub fn run(
    config: &AppConfig,
    input: PathBuf,
    text_column: String,
    label_column: String,
    alpha: f64,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let output = output
        .or_else(|| config.analysis.classifier_model.clone())
        .ok_or_else(|| {
            anyhow::anyhow!("No model path: pass --output or set TONECHECK_CLASSIFIER_MODEL")
        })?;

    let dataset = Dataset::from_path(&input)
        .map_err(|e| anyhow::anyhow!("Failed to load {}: {e}", input.display()))?;
    let model = NaiveBayesModel::train_from_dataset(&dataset, &text_column, &label_column, alpha)?;
    model.save(&output)?;

    let classes: Vec<&str> = model.classes().collect();
    println!("Trained on {} rows", dataset.len());
    println!("  Classes:    {}", classes.join(", "));
    println!("  Vocabulary: {} words", model.vocabulary_size());
    println!("  Saved to:   {}", output.display());

    Ok(())
}
