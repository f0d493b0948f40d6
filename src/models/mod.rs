//! Fraud classifier and risk scoring components

pub mod classifier;
pub mod loader;
pub mod scorer;

pub use classifier::{FraudClassifier, OnnxClassifier};
pub use loader::load_classifier;
pub use scorer::{fallback_probability, RiskScorer, Score};
