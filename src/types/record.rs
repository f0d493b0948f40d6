//! Feature record handed to the fraud classifier

use crate::types::submission::MerchantCategory;
use serde::{Deserialize, Serialize};

/// Cardholder gender column of the training schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    #[serde(alias = "f")]
    F,
    #[serde(alias = "m")]
    M,
}

impl Gender {
    /// Ordinal code used when the column is fed to the model
    pub fn code(self) -> u8 {
        match self {
            Gender::F => 0,
            Gender::M => 1,
        }
    }
}

/// Column names in the exact order the classifier expects them.
pub const FEATURE_NAMES: [&str; 23] = [
    "category",
    "amt",
    "log_amt",
    "trans_hour",
    "is_late_night",
    "trans_month",
    "is_holiday_season",
    "distance_km",
    "time_since_last_trans",
    "count_30_days",
    "count_7_days",
    "count_1_day",
    "gender",
    "lat",
    "long",
    "merch_lat",
    "merch_long",
    "trans_dayofweek",
    "is_night",
    "usual_lat",
    "usual_long",
    "distance_from_usual_km",
    "city_pop",
];

/// Number of columns in a feature record
pub const FEATURE_COUNT: usize = FEATURE_NAMES.len();

/// One transaction in the classifier's serving schema.
///
/// Built once per submission by [`crate::feature_builder::FeatureBuilder`] and
/// dropped after scoring. Columns the form cannot supply are filled from
/// [`crate::config::FeatureDefaults`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionFeatureRecord {
    pub category: MerchantCategory,
    pub amount: f64,
    pub log_amount: f64,
    pub transaction_hour: u8,
    /// 1 when the hour is in 22..=23 or 0..=5
    pub is_late_night: u8,
    pub transaction_month: u8,
    pub is_holiday_season: u8,
    pub distance_km: f64,
    /// Hours since the previous transaction
    pub time_since_last_transaction: f64,
    pub count_30_days: f64,
    pub count_7_days: f64,
    pub count_1_day: f64,
    pub gender: Gender,
    pub lat: f64,
    pub long: f64,
    pub merchant_lat: f64,
    pub merchant_long: f64,
    pub day_of_week: u8,
    /// 1 when the hour is in 21..=23 or 0..=5
    pub is_night: u8,
    pub usual_lat: f64,
    pub usual_long: f64,
    pub distance_from_usual_km: f64,
    pub city_population: u64,
}

impl TransactionFeatureRecord {
    /// Flatten the record into model input order (see [`FEATURE_NAMES`]).
    pub fn to_vector(&self) -> Vec<f32> {
        vec![
            self.category.code() as f32,
            self.amount as f32,
            self.log_amount as f32,
            self.transaction_hour as f32,
            self.is_late_night as f32,
            self.transaction_month as f32,
            self.is_holiday_season as f32,
            self.distance_km as f32,
            self.time_since_last_transaction as f32,
            self.count_30_days as f32,
            self.count_7_days as f32,
            self.count_1_day as f32,
            self.gender.code() as f32,
            self.lat as f32,
            self.long as f32,
            self.merchant_lat as f32,
            self.merchant_long as f32,
            self.day_of_week as f32,
            self.is_night as f32,
            self.usual_lat as f32,
            self.usual_long as f32,
            self.distance_from_usual_km as f32,
            self.city_population as f32,
        ]
    }
}
