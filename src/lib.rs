//! Fraud Risk Demo Library
//!
//! Derives a classifier feature record from a transaction form, scores it
//! with an ONNX fraud model (or a closed-form fallback when no model is
//! available) and maps the probability to a risk tier.

pub mod config;
pub mod feature_builder;
pub mod models;
pub mod render;
pub mod types;

pub use config::AppConfig;
pub use feature_builder::{FeatureBuilder, FeatureSet};
pub use models::scorer::RiskScorer;
pub use types::{
    assessment::{RiskAssessment, RiskTier},
    record::TransactionFeatureRecord,
    submission::TransactionForm,
};

use anyhow::{Context, Result};
use std::io::Read;
use tracing::info;

/// Argument value that selects stdin as the submission source
pub const STDIN_SOURCE: &str = "-";

/// Read one submission: `None` submits the form defaults, `-` reads JSON
/// from `stdin`, anything else is a JSON file path.
pub fn read_submission<R: Read>(source: Option<&str>, stdin: R) -> Result<TransactionForm> {
    match source {
        None => {
            info!("No submission given, using form defaults");
            Ok(TransactionForm::default())
        }
        Some(STDIN_SOURCE) => TransactionForm::from_reader(stdin),
        Some(path) => TransactionForm::from_path(path),
    }
}

/// Handle one form submission: validate, build features, score once.
pub fn submit(
    form: &TransactionForm,
    builder: &FeatureBuilder,
    scorer: &RiskScorer,
) -> Result<RiskAssessment> {
    form.validate().context("Invalid transaction form")?;
    let features = builder.build(form);
    Ok(scorer.assess(&features))
}
