//! Risk assessment produced for a scored submission

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Risk tier shown to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    Low,
    Moderate,
    High,
}

impl RiskTier {
    /// Map a fraud probability to a tier. Lower bounds are inclusive.
    pub fn from_probability(probability: f64, thresholds: &RiskTierThresholds) -> Self {
        if probability >= thresholds.high {
            RiskTier::High
        } else if probability >= thresholds.moderate {
            RiskTier::Moderate
        } else {
            RiskTier::Low
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RiskTier::Low => "LOW RISK",
            RiskTier::Moderate => "MODERATE RISK",
            RiskTier::High => "HIGH RISK",
        }
    }

    /// Banner text displayed with the tier
    pub fn banner(self) -> &'static str {
        match self {
            RiskTier::Low => "LOW RISK - Likely Legitimate",
            RiskTier::Moderate => "MODERATE RISK - Review Recommended",
            RiskTier::High => "HIGH RISK - Potential Fraud Detected",
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Configurable tier boundaries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskTierThresholds {
    pub moderate: f64,
    pub high: f64,
}

/// Tier boundaries that would break the three-tier mapping
#[derive(Debug, Error, PartialEq)]
pub enum ThresholdError {
    #[error("risk_tiers.{field} must be a finite value within [0, 1], got {value}")]
    OutOfRange { field: &'static str, value: f64 },

    #[error("risk_tiers.moderate ({moderate}) must not exceed risk_tiers.high ({high})")]
    Inverted { moderate: f64, high: f64 },
}

impl RiskTierThresholds {
    /// Require `0 <= moderate <= high <= 1`.
    pub fn validate(&self) -> Result<(), ThresholdError> {
        for (field, value) in [("moderate", self.moderate), ("high", self.high)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ThresholdError::OutOfRange { field, value });
            }
        }
        if self.moderate > self.high {
            return Err(ThresholdError::Inverted {
                moderate: self.moderate,
                high: self.high,
            });
        }
        Ok(())
    }
}

impl Default for RiskTierThresholds {
    fn default() -> Self {
        Self {
            moderate: 0.10,
            high: 0.30,
        }
    }
}

/// Which path produced the probability
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ScoreSource {
    /// A loaded classifier
    Model { name: String },
    /// The closed-form heuristic used without a classifier
    Fallback,
}

impl ScoreSource {
    pub fn is_fallback(&self) -> bool {
        matches!(self, ScoreSource::Fallback)
    }
}

impl fmt::Display for ScoreSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreSource::Model { name } => write!(f, "model:{}", name),
            ScoreSource::Fallback => f.write_str("fallback"),
        }
    }
}

/// Outcome of a single form submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// Unique assessment identifier
    pub assessment_id: String,

    /// Fraud probability (0.0 - 1.0)
    pub probability: f64,

    pub tier: RiskTier,

    pub source: ScoreSource,

    /// Amount relative to the customer's typical amount
    pub amount_deviation_ratio: f64,

    pub assessed_at: DateTime<Utc>,
}

impl RiskAssessment {
    pub fn new(
        probability: f64,
        source: ScoreSource,
        amount_deviation_ratio: f64,
        thresholds: &RiskTierThresholds,
    ) -> Self {
        Self {
            assessment_id: uuid::Uuid::new_v4().to_string(),
            probability,
            tier: RiskTier::from_probability(probability, thresholds),
            source,
            amount_deviation_ratio,
            assessed_at: Utc::now(),
        }
    }
}
