//! Type definitions for the fraud risk demo

pub mod assessment;
pub mod record;
pub mod submission;

pub use assessment::{RiskAssessment, RiskTier, RiskTierThresholds, ScoreSource, ThresholdError};
pub use record::{Gender, TransactionFeatureRecord};
pub use submission::{FormError, MerchantCategory, TransactionForm};
