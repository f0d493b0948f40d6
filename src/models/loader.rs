//! Loading the classifier artifact into an ONNX Runtime session

use crate::config::ModelsConfig;
use crate::models::classifier::OnnxClassifier;
use anyhow::{Context, Result};
use ort::session::{builder::GraphOptimizationLevel, Session};
use std::path::Path;
use tracing::info;

/// ONNX session plus the tensor names used to call it
pub struct LoadedModel {
    /// Model name (artifact file stem)
    pub name: String,
    pub session: Session,
    pub input_name: String,
    /// Output carrying the class probabilities
    pub output_name: String,
}

/// Load the configured classifier artifact.
///
/// Fails without touching ONNX Runtime when the artifact is missing, so the
/// caller can fall back cheaply.
pub fn load_classifier(config: &ModelsConfig) -> Result<OnnxClassifier> {
    let path = Path::new(&config.model_path);
    if !path.is_file() {
        anyhow::bail!("Model artifact not found at {}", path.display());
    }
    let name = model_name(path);

    ort::init().commit()?;
    let session = Session::builder()?
        .with_optimization_level(GraphOptimizationLevel::Level3)?
        .with_intra_threads(config.onnx_threads)?
        .commit_from_file(path)
        .with_context(|| format!("Failed to load model from {}", path.display()))?;

    let input_name = session
        .inputs
        .first()
        .map(|i| i.name.clone())
        .context("Model declares no inputs")?;
    let output_name = probability_output(session.outputs.iter().map(|o| o.name.as_str()))
        .map(str::to_string)
        .context("Model declares no probability output")?;

    info!(
        model = %name,
        path = %path.display(),
        input = %input_name,
        output = %output_name,
        threads = config.onnx_threads,
        "Classifier artifact loaded"
    );

    Ok(OnnxClassifier::new(LoadedModel {
        name,
        session,
        input_name,
        output_name,
    }))
}

/// Classifier name derived from the artifact's file stem.
fn model_name(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("classifier")
        .to_string()
}

/// Pick the probability output among a model's outputs.
///
/// Binary classifier exports carry a label output next to the probability
/// output; a name containing `prob` wins, otherwise the last non-label output.
fn probability_output<'a>(names: impl IntoIterator<Item = &'a str>) -> Option<&'a str> {
    let names: Vec<&str> = names.into_iter().collect();
    names
        .iter()
        .find(|n| n.contains("prob"))
        .or_else(|| names.iter().rev().find(|n| !n.contains("label")))
        .copied()
}
