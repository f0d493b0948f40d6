//! Risk scoring: classifier delegation with a closed-form fallback

use crate::config::{AppConfig, ModelsConfig};
use crate::feature_builder::FeatureSet;
use crate::models::classifier::{FraudClassifier, FRAUD_CLASS};
use crate::models::loader::load_classifier;
use crate::types::assessment::{RiskAssessment, RiskTierThresholds, ScoreSource};
use tracing::{debug, error, info, warn};

/// Baseline fraud probability of the fallback heuristic
pub const FALLBACK_BASE_PROBABILITY: f64 = 0.05;
/// Weight of `(amount_deviation_ratio - 1)` in the fallback heuristic
pub const FALLBACK_DEVIATION_WEIGHT: f64 = 0.3;
/// Weight of the late-night flag in the fallback heuristic
pub const FALLBACK_LATE_NIGHT_WEIGHT: f64 = 0.2;

/// Fraud probability when no classifier is available.
///
/// A crude linear heuristic for illustration, not a calibrated model.
/// Always within `[0, 1]`.
pub fn fallback_probability(amount_deviation_ratio: f64, is_late_night: u8) -> f64 {
    let raw = FALLBACK_BASE_PROBABILITY
        + (amount_deviation_ratio - 1.0) * FALLBACK_DEVIATION_WEIGHT
        + is_late_night as f64 * FALLBACK_LATE_NIGHT_WEIGHT;
    raw.clamp(0.0, 1.0)
}

/// Probability and the path that produced it
#[derive(Debug, Clone, PartialEq)]
pub struct Score {
    pub probability: f64,
    pub source: ScoreSource,
}

/// Scores feature sets with an optional classifier.
///
/// Without a classifier every submission goes through [`fallback_probability`].
pub struct RiskScorer {
    classifier: Option<Box<dyn FraudClassifier>>,
    thresholds: RiskTierThresholds,
    /// Why the classifier is missing, if loading was attempted and failed
    load_error: Option<String>,
}

impl RiskScorer {
    pub fn new(
        classifier: Option<Box<dyn FraudClassifier>>,
        thresholds: RiskTierThresholds,
    ) -> Self {
        Self {
            classifier,
            thresholds,
            load_error: None,
        }
    }

    /// Scorer that always uses the fallback heuristic
    pub fn fallback_only(thresholds: RiskTierThresholds) -> Self {
        Self::new(None, thresholds)
    }

    /// Build the scorer from configuration, loading the classifier artifact.
    ///
    /// A load failure is logged and leaves the scorer in fallback mode for
    /// its whole lifetime.
    pub fn from_config(config: &AppConfig) -> Self {
        let thresholds = config.detection.risk_tiers.clone();
        match Self::load(&config.models) {
            Ok(classifier) => {
                info!(model = %classifier.name(), "Classifier loaded, scoring with model");
                Self::new(Some(classifier), thresholds)
            }
            Err(e) => {
                warn!(
                    path = %config.models.model_path,
                    error = %e,
                    "Classifier unavailable, scoring with fallback heuristic"
                );
                let mut scorer = Self::fallback_only(thresholds);
                scorer.load_error = Some(format!("{:#}", e));
                scorer
            }
        }
    }

    fn load(config: &ModelsConfig) -> anyhow::Result<Box<dyn FraudClassifier>> {
        Ok(Box::new(load_classifier(config)?))
    }

    pub fn is_fallback(&self) -> bool {
        self.classifier.is_none()
    }

    /// Load failure message for the operator, if any
    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    /// Name of the loaded classifier, `None` in fallback mode
    pub fn model_name(&self) -> Option<&str> {
        self.classifier.as_ref().map(|c| c.name())
    }

    /// Compute the fraud probability for one feature set.
    ///
    /// Classifier output is trusted as-is. If the classifier errors on this
    /// record, the fallback heuristic scores it instead.
    pub fn score(&self, features: &FeatureSet) -> Score {
        if let Some(classifier) = &self.classifier {
            match classifier.predict_probability(&features.record) {
                Ok(distribution) => {
                    let probability = distribution[FRAUD_CLASS];
                    debug!(model = %classifier.name(), probability, "Model inference complete");
                    return Score {
                        probability,
                        source: ScoreSource::Model {
                            name: classifier.name().to_string(),
                        },
                    };
                }
                Err(e) => {
                    error!(
                        model = %classifier.name(),
                        error = %e,
                        "Model inference failed, using fallback heuristic"
                    );
                }
            }
        }

        let probability =
            fallback_probability(features.amount_deviation_ratio, features.record.is_late_night);
        debug!(
            probability,
            amount_deviation_ratio = features.amount_deviation_ratio,
            "Fallback scoring complete"
        );

        Score {
            probability,
            source: ScoreSource::Fallback,
        }
    }

    /// Score a feature set and map it to a risk tier.
    pub fn assess(&self, features: &FeatureSet) -> RiskAssessment {
        let score = self.score(features);
        RiskAssessment::new(
            score.probability,
            score.source,
            features.amount_deviation_ratio,
            &self.thresholds,
        )
    }
}
