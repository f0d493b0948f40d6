//! Rendering of assessments for the terminal

use crate::config::OutputFormat;
use crate::types::assessment::{RiskAssessment, RiskTier, ScoreSource};
use anyhow::Result;
use std::fmt::Write;

/// Caption printed under every text assessment
pub const CAPTION: &str =
    "Model: XGBoost | Tuned for high recall | Results are illustrative and depend on input accuracy";

/// Notice shown when the classifier could not be loaded
pub fn model_unavailable_notice(reason: &str) -> String {
    format!("WARNING: model unavailable ({}); using fallback heuristic", reason)
}

/// Notice shown when the classifier loaded
pub fn model_loaded_notice(name: &str) -> String {
    format!("Model loaded successfully ({}); scoring with the classifier", name)
}

/// Render an assessment in the configured format.
pub fn render(assessment: &RiskAssessment, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text(assessment)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(assessment)?),
    }
}

/// Format a probability as a percentage with two decimals, e.g. `20.00%`.
pub fn format_percent(probability: f64) -> String {
    format!("{:.2}%", probability * 100.0)
}

fn render_text(assessment: &RiskAssessment) -> String {
    let mut out = String::new();

    // Writing to a String cannot fail.
    let _ = writeln!(out, "Fraud Probability");
    let _ = writeln!(
        out,
        "  Probability of Fraud: {}",
        format_percent(assessment.probability)
    );
    let marker = match assessment.tier {
        RiskTier::Low => "[OK]",
        RiskTier::Moderate | RiskTier::High => "[!]",
    };
    let _ = writeln!(out, "  {} {}", marker, assessment.tier.banner());

    if let ScoreSource::Fallback = assessment.source {
        let _ = writeln!(
            out,
            "  Scored with the fallback heuristic (illustrative only, not a trained model)"
        );
    }

    let _ = writeln!(out, "---");
    let _ = write!(out, "{}", CAPTION);
    out
}
