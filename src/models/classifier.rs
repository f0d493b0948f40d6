//! Fraud classifier capability and its ONNX Runtime implementation

use crate::models::loader::LoadedModel;
use crate::types::record::TransactionFeatureRecord;
use anyhow::{Context, Result};
use ort::memory::Allocator;
use ort::value::{DowncastableTarget, DynMapValueType, DynSequenceValueType};
use std::sync::Mutex;
use tracing::debug;

/// Index of the fraud class in a class distribution
pub const FRAUD_CLASS: usize = 1;

/// Anything that can turn a feature record into `[P(legit), P(fraud)]`.
pub trait FraudClassifier: Send + Sync {
    /// Name reported in assessments and logs
    fn name(&self) -> &str;

    /// Class distribution for one record, legit first.
    fn predict_probability(&self, record: &TransactionFeatureRecord) -> Result<[f64; 2]>;
}

/// Binary classifier backed by an ONNX Runtime session.
pub struct OnnxClassifier {
    name: String,
    // `Session::run` needs exclusive access.
    model: Mutex<LoadedModel>,
}

impl OnnxClassifier {
    pub fn new(model: LoadedModel) -> Self {
        Self {
            name: model.name.clone(),
            model: Mutex::new(model),
        }
    }

    fn run(&self, features: Vec<f32>) -> Result<[f64; 2]> {
        use ort::value::Tensor;

        let shape = vec![1_i64, features.len() as i64];
        let input_tensor =
            Tensor::from_array((shape, features)).context("Failed to create input tensor")?;

        let mut model = self
            .model
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock error: {}", e))?;
        let input_name = model.input_name.clone();
        let output_name = model.output_name.clone();

        let outputs = model
            .session
            .run(ort::inputs![input_name.as_str() => input_tensor])?;

        extract_distribution(&outputs, &output_name, &self.name)
    }
}

impl FraudClassifier for OnnxClassifier {
    fn name(&self) -> &str {
        &self.name
    }

    fn predict_probability(&self, record: &TransactionFeatureRecord) -> Result<[f64; 2]> {
        self.run(record.to_vector())
    }
}

/// Pull the class distribution out of the session outputs.
///
/// Handles plain probability tensors and the `seq(map(int64, float))`
/// form produced by zipmap exports.
fn extract_distribution(
    outputs: &ort::session::SessionOutputs,
    output_name: &str,
    model_name: &str,
) -> Result<[f64; 2]> {
    if let Some(output) = outputs.get(output_name) {
        if let Some(distribution) = extract_from_value(output, model_name) {
            return Ok(distribution);
        }
    }

    for (name, output) in outputs.iter() {
        if name.contains("label") {
            continue;
        }
        if let Some(distribution) = extract_from_value(&output, model_name) {
            debug!(model = %model_name, output = %name, "Extracted from fallback output");
            return Ok(distribution);
        }
    }

    anyhow::bail!("No probability output found for model {}", model_name)
}

fn extract_from_value(output: &ort::value::DynValue, model_name: &str) -> Option<[f64; 2]> {
    if let Ok((shape, data)) = output.try_extract_tensor::<f32>() {
        let dims: Vec<i64> = shape.iter().copied().collect();
        let distribution = distribution_from_tensor(&dims, data)?;
        debug!(model = %model_name, p_fraud = distribution[FRAUD_CLASS], "Extracted from tensor");
        return Some(distribution);
    }

    if DynSequenceValueType::can_downcast(&output.dtype()) {
        match distribution_from_sequence_map(output) {
            Ok(distribution) => {
                debug!(model = %model_name, p_fraud = distribution[FRAUD_CLASS], "Extracted from seq(map)");
                return Some(distribution);
            }
            Err(e) => debug!(model = %model_name, error = %e, "seq(map) extraction failed"),
        }
    }

    None
}

/// Read the first row of a probability tensor.
///
/// `[batch, 2]` and `[2]` are read directly; a single probability column is
/// taken as `P(fraud)`.
fn distribution_from_tensor(dims: &[i64], data: &[f32]) -> Option<[f64; 2]> {
    let num_classes = match dims {
        [_, classes] => *classes,
        [classes] => *classes,
        _ => return None,
    };

    match num_classes {
        n if n >= 2 && data.len() >= 2 => Some([data[0] as f64, data[1] as f64]),
        1 if !data.is_empty() => {
            let p_fraud = data[0] as f64;
            Some([1.0 - p_fraud, p_fraud])
        }
        _ => None,
    }
}

fn distribution_from_sequence_map(output: &ort::value::DynValue) -> Result<[f64; 2]> {
    let allocator = Allocator::default();

    let sequence = output
        .downcast_ref::<DynSequenceValueType>()
        .map_err(|e| anyhow::anyhow!("Failed to downcast to sequence: {}", e))?;

    let maps = sequence.try_extract_sequence::<DynMapValueType>(&allocator)?;
    let first = maps
        .first()
        .ok_or_else(|| anyhow::anyhow!("Empty sequence"))?;

    let kv_pairs = first.try_extract_key_values::<i64, f32>()?;
    distribution_from_pairs(&kv_pairs)
}

/// Build `[P(legit), P(fraud)]` from class-id/probability pairs.
fn distribution_from_pairs(pairs: &[(i64, f32)]) -> Result<[f64; 2]> {
    let lookup = |class: i64| {
        pairs
            .iter()
            .find(|(id, _)| *id == class)
            .map(|(_, p)| *p as f64)
    };

    match (lookup(0), lookup(1)) {
        (Some(legit), Some(fraud)) => Ok([legit, fraud]),
        (None, Some(fraud)) => Ok([1.0 - fraud, fraud]),
        (Some(legit), None) => Ok([legit, 1.0 - legit]),
        (None, None) => Err(anyhow::anyhow!("No class probability found in map")),
    }
}
